use std::io;
use std::path::Path;

/// Opens a path with the OS default handler (file browser for folders).
pub trait Launcher {
    fn open(&self, path: &Path) -> io::Result<()>;
}

pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}
