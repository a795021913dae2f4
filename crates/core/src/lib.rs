pub mod arr;
pub mod clean;
pub mod config;
pub mod events;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod session;
pub mod testing;

pub use arr::{ArrApi, ArrClient, ArrError};
pub use clean::{Cleaner, DeletionError, DeletionOutcome};
pub use config::{
    load_config, load_config_from_str, validate_config, Category, Config, ConfigError, Instance,
    SanitizedConfig, ScanOptions,
};
pub use events::{EventSink, JsonlEventSink, NoopEventSink, ScanEvent};
pub use reconcile::{ReconcileError, Reconciler};
pub use report::{Reporter, SilentReporter};
pub use scan::{is_broken, BrokenLink, ScanResult, Scanner};
pub use session::{
    check_prerequisites, Confirmer, PrerequisiteError, RunMode, Session, SessionOutcome,
    SessionReport,
};
