#![forbid(unsafe_code)]

//! Construction-time settings for a [`Gui`](crate::Gui).

use std::path::PathBuf;

/// Builder-style settings consumed by [`Gui::new`](crate::Gui::new).
///
/// Only the application name is required; it selects the save
/// directory (`<save_dir>/saves/<app_name>`).
#[derive(Debug, Clone)]
pub struct GuiSettings {
    pub(crate) app_name: String,
    pub(crate) save_dir: PathBuf,
    pub(crate) cell_size: f32,
    pub(crate) autosave_on_shutdown: bool,
    pub(crate) load_latest_on_startup: bool,
}

impl GuiSettings {
    /// Settings for `app_name` with defaults: save files under the
    /// current directory, 24 px grid cell, autosave on shutdown, and
    /// the most recent save loaded at startup.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            save_dir: PathBuf::from("."),
            cell_size: 24.0,
            autosave_on_shutdown: true,
            load_latest_on_startup: true,
        }
    }

    /// Base directory under which `saves/<app_name>` is created.
    #[must_use]
    pub fn save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    /// Grid cell size in pixels: row height, title-bar height, and the
    /// snap grid all derive from it.
    #[must_use]
    pub fn cell_size(mut self, cell: f32) -> Self {
        self.cell_size = cell;
        self
    }

    /// Whether [`Gui::shutdown`](crate::Gui::shutdown) writes an
    /// autosave.
    #[must_use]
    pub fn autosave_on_shutdown(mut self, on: bool) -> Self {
        self.autosave_on_shutdown = on;
        self
    }

    /// Whether construction restores the most recently modified save.
    #[must_use]
    pub fn load_latest_on_startup(mut self, on: bool) -> Self {
        self.load_latest_on_startup = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = GuiSettings::new("demo");
        assert_eq!(s.app_name, "demo");
        assert_eq!(s.cell_size, 24.0);
        assert!(s.autosave_on_shutdown);
        assert!(s.load_latest_on_startup);
    }

    #[test]
    fn builder_overrides() {
        let s = GuiSettings::new("demo")
            .save_dir("/tmp/x")
            .cell_size(32.0)
            .autosave_on_shutdown(false)
            .load_latest_on_startup(false);
        assert_eq!(s.save_dir, PathBuf::from("/tmp/x"));
        assert_eq!(s.cell_size, 32.0);
        assert!(!s.autosave_on_shutdown);
        assert!(!s.load_latest_on_startup);
    }
}
