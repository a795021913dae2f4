use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::arr::{ArrApi, ArrClient, ArrCommand, ArrError, CatalogItem, CatalogKind};
use crate::config::{Category, Instance};

use super::error::{ReconcileError, ReconcileStage};
use super::parse::parse_folder_name;

/// Catalog entry resolved for a deleted link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationTarget {
    pub title: String,
    pub year: Option<u16>,
    pub item_id: i64,
}

/// Notifies one Radarr/Sonarr instance about deleted links.
///
/// Pipeline per link: parse folder name, locate the catalog item, refresh it,
/// then search for its missing content. The first failing step aborts the
/// rest; steps already issued are not undone.
pub struct Reconciler {
    api: Arc<dyn ArrApi>,
    instance: String,
    category: Category,
}

impl Reconciler {
    pub fn new(api: Arc<dyn ArrApi>, instance: impl Into<String>, category: Category) -> Self {
        Self {
            api,
            instance: instance.into(),
            category,
        }
    }

    /// Build a reconciler backed by an HTTP client for `instance`.
    pub fn for_instance(instance: &Instance) -> Result<Self, ArrError> {
        let client = ArrClient::new(&instance.name, &instance.api_url, &instance.api_key)?;
        Ok(Self::new(
            Arc::new(client),
            instance.name.clone(),
            instance.category,
        ))
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Run the pipeline for the link at `link_path`, which has already been deleted.
    pub async fn reconcile(&self, link_path: &Path) -> Result<ReconciliationTarget, ReconcileError> {
        let kind = CatalogKind::from(self.category);

        let (title, year) = self.parse(link_path)?;

        let item = self.locate(kind, &title, year).await?;
        info!(
            "[{}] Found {} - ID: {}",
            self.instance,
            display_title(&title, year),
            item.id
        );

        let ack = self
            .api
            .send_command(&ArrCommand::refresh(kind, item.id))
            .await
            .map_err(ReconcileError::api(ReconcileStage::Refresh))
            .inspect_err(|e| warn!("[{}] {}", self.instance, e))?;
        info!(
            "[{}] Refresh+rescan queued for ID {} (command_id={:?})",
            self.instance, item.id, ack.id
        );

        let ack = self
            .api
            .send_command(&ArrCommand::search(kind, item.id))
            .await
            .map_err(ReconcileError::api(ReconcileStage::Search))
            .inspect_err(|e| warn!("[{}] {}", self.instance, e))?;
        info!(
            "[{}] Search queued for ID {} (command_id={:?})",
            self.instance, item.id, ack.id
        );

        Ok(ReconciliationTarget {
            title,
            year,
            item_id: item.id,
        })
    }

    fn parse(&self, link_path: &Path) -> Result<(String, Option<u16>), ReconcileError> {
        let folder = link_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some((title, year)) = parse_folder_name(&folder) else {
            warn!("[{}] Cannot parse folder name: '{}'", self.instance, folder);
            return Err(ReconcileError::Parse { folder });
        };

        if year.is_none() && self.category.requires_year() {
            warn!(
                "[{}] Folder '{}' has no year, cannot match a movie",
                self.instance, folder
            );
            return Err(ReconcileError::MissingYear { title });
        }

        Ok((title, year))
    }

    async fn locate(
        &self,
        kind: CatalogKind,
        title: &str,
        year: Option<u16>,
    ) -> Result<CatalogItem, ReconcileError> {
        let items = self
            .api
            .list_catalog(kind)
            .await
            .map_err(ReconcileError::api(ReconcileStage::Locate))
            .inspect_err(|e| warn!("[{}] {}", self.instance, e))?;

        match find_item(&items, kind, title, year) {
            Some(item) => Ok(item.clone()),
            None => {
                warn!(
                    "[{}] No catalog entry for {}",
                    self.instance,
                    display_title(title, year)
                );
                Err(ReconcileError::NotFound {
                    title: title.to_string(),
                    year,
                })
            }
        }
    }
}

/// Exact, case-sensitive title match; movies must also match the year.
fn find_item<'a>(
    items: &'a [CatalogItem],
    kind: CatalogKind,
    title: &str,
    year: Option<u16>,
) -> Option<&'a CatalogItem> {
    items.iter().find(|item| {
        item.title == title
            && match kind {
                CatalogKind::Movie => item.year.is_some() && item.year == year,
                CatalogKind::Series => true,
            }
    })
}

fn display_title(title: &str, year: Option<u16>) -> String {
    match year {
        Some(y) => format!("{} ({})", title, y),
        None => title.to_string(),
    }
}
