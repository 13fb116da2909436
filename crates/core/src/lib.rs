pub mod completion;
pub mod config;
pub mod document;
pub mod equipment;
pub mod error;
pub mod template;
pub mod usage;

pub use completion::{CompletionEntry, CompletionKey, CompletionState};
pub use config::Config;
pub use document::{load_template, MaintenanceTemplateDocument};
pub use equipment::*;
pub use error::*;
pub use template::{validate_offsets, MaintenanceActivity, MaintenanceTemplate};
pub use usage::*;
