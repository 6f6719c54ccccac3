use std::path::{Path, PathBuf};

/// Synchronous dialogs. Every method blocks until the user answers;
/// `None`/`false` mean the user cancelled.
pub trait Prompt {
    fn text_input(&mut self, title: &str, label: &str) -> Option<String>;
    fn pick_directory(&mut self, title: &str, start: Option<&Path>) -> Option<PathBuf>;
    fn warn(&mut self, title: &str, message: &str);
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}
