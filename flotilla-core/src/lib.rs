//! Flotilla core library: domain types, layered settings, errors.
//!
//! - [`types`]: repository records and branch descriptors
//! - [`settings`]: load / defaults for `~/.flotilla/config.yaml`
//! - [`error`]: [`SettingsError`], [`BranchNameError`]

pub mod error;
pub mod settings;
pub mod types;

pub use error::{BranchNameError, SettingsError};
pub use settings::{GitSettings, ScanSettings, Settings, WorkflowSettings};
pub use types::{BranchName, RepositoryRecord};
