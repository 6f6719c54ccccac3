//! gsm-core: Registry, table model, and backup logic for the game save manager
//!
//! The crate keeps the front-ends thin:
//! - `store` loads and persists the registry JSON file
//! - `table` renders the registry into rows (pure function of its value)
//! - `controller` owns the registry and runs every user action
//! - `backup` copies registered folders and reports each one separately
//! - `prompt` / `launch` are the seams for dialogs and the OS file browser
//!
pub mod backup;
pub mod config;
pub mod controller;
pub mod error;
pub mod launch;
pub mod model;
pub mod prompt;
pub mod store;
pub mod table;

pub use backup::{BackupItem, BackupReport, CopyError, CopyStats, backup_all, copy_tree};
pub use controller::{AddOutcome, SaveManager};
pub use error::Error;
pub use launch::{Launcher, SystemLauncher};
pub use model::{Registry, SaveRecord};
pub use prompt::Prompt;
pub use store::RegistryStore;
pub use table::{Selection, TableRow, TableView};
