//! Types for the Radarr/Sonarr v3 API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Category;

/// Which catalog an instance manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Radarr
    Movie,
    /// Sonarr
    Series,
}

impl CatalogKind {
    /// Listing endpoint, relative to `/api/v3/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CatalogKind::Movie => "movie",
            CatalogKind::Series => "series",
        }
    }

    /// Command body field carrying the item ids.
    pub fn id_field(&self) -> &'static str {
        match self {
            CatalogKind::Movie => "movieIds",
            CatalogKind::Series => "seriesIds",
        }
    }
}

impl From<Category> for CatalogKind {
    fn from(category: Category) -> Self {
        match category {
            Category::Films => CatalogKind::Movie,
            Category::Series => CatalogKind::Series,
        }
    }
}

/// One entry of a catalog listing. Only the fields used for matching are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// Commands sent through `POST /api/v3/command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    RefreshMovie,
    RefreshSeries,
    MoviesSearch,
    SeriesSearch,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::RefreshMovie => "RefreshMovie",
            CommandName::RefreshSeries => "RefreshSeries",
            CommandName::MoviesSearch => "MoviesSearch",
            CommandName::SeriesSearch => "SeriesSearch",
        }
    }
}

/// A command addressed to a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrCommand {
    pub name: CommandName,
    pub kind: CatalogKind,
    pub item_id: i64,
}

impl ArrCommand {
    /// Refresh metadata and rescan disk for an item.
    pub fn refresh(kind: CatalogKind, item_id: i64) -> Self {
        let name = match kind {
            CatalogKind::Movie => CommandName::RefreshMovie,
            CatalogKind::Series => CommandName::RefreshSeries,
        };
        Self {
            name,
            kind,
            item_id,
        }
    }

    /// Search indexers for the item's missing content.
    pub fn search(kind: CatalogKind, item_id: i64) -> Self {
        let name = match kind {
            CatalogKind::Movie => CommandName::MoviesSearch,
            CatalogKind::Series => CommandName::SeriesSearch,
        };
        Self {
            name,
            kind,
            item_id,
        }
    }

    /// JSON body: `{"name": <CommandName>, <idField>: [id]}`
    pub fn body(&self) -> Value {
        let mut body = json!({ "name": self.name.as_str() });
        body[self.kind.id_field()] = json!([self.item_id]);
        body
    }
}

/// Acknowledgement returned by the command endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
