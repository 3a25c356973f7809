#![forbid(unsafe_code)]

//! Save directory management.
//!
//! One directory per host application (`<base>/saves/<app>`). Each
//! save is a named `.json` document plus a human-readable `.txt` tree
//! preview sharing the filename stem. Document writes are atomic
//! (write to a temp file, then rename) so a crash mid-save never
//! leaves a truncated document behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::document::Document;

/// Errors from persistence and save-file operations.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A save file exists but could not be parsed.
    #[error("malformed save document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No save file with the given name exists.
    #[error("no save named {0:?}")]
    MissingSave(String),
}

/// Metadata for one save file, as listed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveInfo {
    /// Filename stem (no directory, no extension).
    pub name: String,
    /// Last modification time.
    pub modified: SystemTime,
}

/// A save directory for one application.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    /// Open (creating if needed) the save directory for `app_name`.
    ///
    /// An uncreatable directory is the one unrecoverable persistence
    /// condition; it surfaces to the host as a startup failure.
    pub fn new(base: &Path, app_name: &str) -> Result<Self, PersistError> {
        let dir = base.join("saves").join(app_name);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a named save: `<name>.json` plus a `<name>.txt` preview.
    ///
    /// The preview is advisory; a failure writing it is logged and
    /// ignored, while the document write itself must succeed.
    pub fn save(&self, name: &str, doc: &Document, preview: &str) -> Result<(), PersistError> {
        let json = doc.to_json()?;
        self.write_atomic(&self.json_path(name), &json)?;
        let preview_text = format!(
            "NOTICE: this file is a preview of the tree stored in {name}.json.\n\
             Edit or delete the json file instead; changes here are overwritten.\n\n{preview}"
        );
        if let Err(err) = fs::write(self.path_with_ext(name, "txt"), preview_text) {
            error!(%err, name, "failed to write tree preview");
        }
        info!(name, dir = %self.dir.display(), "saved gui state");
        Ok(())
    }

    /// Load a named save.
    pub fn load(&self, name: &str) -> Result<Document, PersistError> {
        let path = self.json_path(name);
        if !path.is_file() {
            return Err(PersistError::MissingSave(name.to_string()));
        }
        let text = fs::read_to_string(&path)?;
        let doc = Document::from_json(&text)?;
        debug!(name, "loaded gui state");
        Ok(doc)
    }

    /// Load the most recently modified save, if any exist.
    ///
    /// A malformed newest file is an error, not a fallback to older
    /// files; the caller decides whether to keep defaults.
    pub fn load_most_recent(&self) -> Result<Option<Document>, PersistError> {
        match self.list()?.first() {
            Some(info) => Ok(Some(self.load(&info.name)?)),
            None => Ok(None),
        }
    }

    /// Delete a named save and its preview.
    pub fn delete(&self, name: &str) -> Result<(), PersistError> {
        let json = self.json_path(name);
        if !json.is_file() {
            return Err(PersistError::MissingSave(name.to_string()));
        }
        fs::remove_file(json)?;
        // The preview may be absent; that is fine.
        let _ = fs::remove_file(self.path_with_ext(name, "txt"));
        info!(name, "deleted save");
        Ok(())
    }

    /// Rename a save (json and preview both move).
    pub fn rename(&self, old: &str, new: &str) -> Result<(), PersistError> {
        let from = self.json_path(old);
        if !from.is_file() {
            return Err(PersistError::MissingSave(old.to_string()));
        }
        fs::rename(from, self.json_path(new))?;
        let old_preview = self.path_with_ext(old, "txt");
        if old_preview.is_file() {
            let _ = fs::rename(old_preview, self.path_with_ext(new, "txt"));
        }
        info!(old, new, "renamed save");
        Ok(())
    }

    /// List saves, most recently modified first.
    pub fn list(&self) -> Result<Vec<SaveInfo>, PersistError> {
        let mut saves = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            saves.push(SaveInfo {
                name: stem.to_string(),
                modified,
            });
        }
        saves.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.name.cmp(&b.name)));
        Ok(saves)
    }

    /// A short, unique-enough stem for "save with generated name".
    #[must_use]
    pub fn generated_name(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.subsec_nanos() as u64 + d.as_secs());
        let mut name = format!("{nanos:x}");
        name.truncate(8);
        // Extremely unlikely, but never overwrite an existing save.
        let mut candidate = name.clone();
        let mut counter = 1;
        while self.json_path(&candidate).is_file() {
            candidate = format!("{name}-{counter}");
            counter += 1;
        }
        candidate
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.path_with_ext(name, "json")
    }

    fn path_with_ext(&self, name: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{name}.{ext}"))
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), PersistError> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
