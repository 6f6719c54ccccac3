use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::backup::{BackupReport, backup_all};
use crate::error::Error;
use crate::launch::Launcher;
use crate::model::{Registry, SaveRecord};
use crate::prompt::Prompt;
use crate::store::RegistryStore;
use crate::table::{self, Selection, TableView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(usize),
    Duplicate,
    EmptyPath,
    NotUnicode(PathBuf),
    Cancelled,
}

/// Owns the registry and keeps it in step with the file on disk.
pub struct SaveManager {
    store: RegistryStore,
    registry: Registry,
}

impl SaveManager {
    pub fn open(store: RegistryStore) -> Result<Self, Error> {
        let registry = store.load()?;
        Ok(Self { store, registry })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    pub fn table(&self) -> TableView {
        table::render(&self.registry)
    }

    /// Appends and persists; a failed write undoes the append.
    pub fn add_record(&mut self, path: &str, game_name: &str) -> Result<AddOutcome, Error> {
        if path.is_empty() {
            return Ok(AddOutcome::EmptyPath);
        }
        let Some(index) = self.registry.push(SaveRecord::new(path, game_name)) else {
            debug!(path, "path already registered");
            return Ok(AddOutcome::Duplicate);
        };
        if let Err(e) = self.store.save(&self.registry) {
            self.registry.pop();
            return Err(e);
        }
        info!(path, game_name, "save path added");
        Ok(AddOutcome::Added(index))
    }

    /// Name prompt, blank-name confirmation, then the folder picker.
    pub fn add_via_picker(
        &mut self,
        prompt: &mut dyn Prompt,
        start: Option<&Path>,
    ) -> Result<AddOutcome, Error> {
        let Some(name) = prompt.text_input("Game Name", "Enter the game name:") else {
            return Ok(AddOutcome::Cancelled);
        };
        let name = name.trim().to_string();
        if name.is_empty() {
            prompt.warn("Game Name", "No game name was entered.");
            if !prompt.confirm("Game Name", "Add the folder without a game name?") {
                return Ok(AddOutcome::Cancelled);
            }
        }
        let Some(dir) = prompt.pick_directory("Select Directory", start) else {
            return Ok(AddOutcome::Cancelled);
        };
        match dir.to_str() {
            Some(path) => self.add_record(path, &name),
            None => Ok(AddOutcome::NotUnicode(dir.clone())),
        }
    }

    /// Values of the two text fields; the name may be empty.
    pub fn add_manual(&mut self, path: &str, game_name: &str) -> Result<AddOutcome, Error> {
        self.add_record(path.trim(), game_name)
    }

    /// Opens the selected folder; `Ok(None)` when nothing is selected.
    pub fn open_selected(
        &self,
        selection: Selection,
        launcher: &dyn Launcher,
    ) -> Result<Option<&SaveRecord>, Error> {
        let Some(record) = selection.resolve(&self.registry) else {
            return Ok(None);
        };
        let path = PathBuf::from(&record.path);
        launcher
            .open(&path)
            .map_err(|source| Error::Open { path, source })?;
        Ok(Some(record))
    }

    /// Removes the selected record and persists; a failed write puts it back.
    pub fn delete_selected(&mut self, selection: Selection) -> Result<Option<SaveRecord>, Error> {
        let Some(index) = selection.index() else {
            return Ok(None);
        };
        let Some(removed) = self.registry.remove(index) else {
            return Ok(None);
        };
        if let Err(e) = self.store.save(&self.registry) {
            self.registry.insert(index, removed);
            return Err(e);
        }
        info!(path = %removed.path, game_name = %removed.game_name, "save path deleted");
        Ok(Some(removed))
    }

    /// Skipped without prompting when the registry is empty.
    pub fn backup(&self, prompt: &mut dyn Prompt) -> Option<BackupReport> {
        if self.registry.is_empty() {
            debug!("backup skipped, registry is empty");
            return None;
        }
        let dest = prompt.pick_directory("Select Destination Folder", None)?;
        Some(backup_all(&self.registry, &dest))
    }
}
