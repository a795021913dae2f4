//! Mock catalog service for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::arr::{ArrApi, ArrCommand, ArrError, CatalogItem, CatalogKind, CommandAck, CommandName};

#[derive(Debug, Default)]
struct MockArrState {
    catalogs: HashMap<CatalogKind, Vec<CatalogItem>>,
    commands: Vec<ArrCommand>,
    catalog_requests: usize,
    fail_catalog: bool,
    failing_commands: HashSet<CommandName>,
    next_command_id: i64,
}

/// Mock implementation of the ArrApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable catalog listings
/// - Record accepted commands for assertions
/// - Simulate listing or per-command failures
///
/// Clones share state, so a test can keep one handle and pass another to the
/// code under test.
#[derive(Debug, Clone, Default)]
pub struct MockArrApi {
    state: Arc<Mutex<MockArrState>>,
}

impl MockArrApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockArrState> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Add an item to the listing of `kind`.
    pub fn add_item(&self, kind: CatalogKind, item: CatalogItem) {
        self.state().catalogs.entry(kind).or_default().push(item);
    }

    /// Make every catalog listing fail.
    pub fn fail_catalog(&self) {
        self.state().fail_catalog = true;
    }

    /// Make every command named `name` fail.
    pub fn fail_command(&self, name: CommandName) {
        self.state().failing_commands.insert(name);
    }

    /// Commands accepted so far, in order.
    pub fn commands(&self) -> Vec<ArrCommand> {
        self.state().commands.clone()
    }

    /// Number of catalog listing requests received.
    pub fn catalog_requests(&self) -> usize {
        self.state().catalog_requests
    }
}

#[async_trait]
impl ArrApi for MockArrApi {
    async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ArrError> {
        let mut state = self.state();
        state.catalog_requests += 1;
        if state.fail_catalog {
            return Err(ArrError::ApiError {
                status: 503,
                message: "mock catalog unavailable".to_string(),
            });
        }
        Ok(state.catalogs.get(&kind).cloned().unwrap_or_default())
    }

    async fn send_command(&self, command: &ArrCommand) -> Result<CommandAck, ArrError> {
        let mut state = self.state();
        if state.failing_commands.contains(&command.name) {
            return Err(ArrError::Timeout);
        }
        state.next_command_id += 1;
        state.commands.push(command.clone());
        Ok(CommandAck {
            id: Some(state.next_command_id),
            status: Some("queued".to_string()),
        })
    }
}
