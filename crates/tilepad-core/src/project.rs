//! Project files: a saved set of generation settings plus the source images
//! they apply to.
//!
//! On disk a project is indented JSON with camelCase keys and `version: 1`.

use crate::color::Color;
use crate::config::GenerationConfig;
use crate::error::{Result, TilePadError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROJECT_VERSION: u32 = 1;

/// Settings stored in a project. Missing keys take their defaults on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub tile_width: u32,
    pub tile_height: u32,
    pub padding: u32,
    pub force_pot: bool,
    pub reorder: bool,
    /// Strip padding from the sources instead of adding it.
    pub remove_padding: bool,
    pub transparent: bool,
    pub background_color: Color,
    /// Directory for exported images; empty means next to each source.
    pub export_directory: String,
    /// Re-export when a source file changes on disk. Stored for editors that
    /// watch sources; generation ignores it.
    pub watch_file: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        GenerationConfig::default().into()
    }
}

impl From<GenerationConfig> for ProjectSettings {
    fn from(cfg: GenerationConfig) -> Self {
        Self {
            tile_width: cfg.tile_width,
            tile_height: cfg.tile_height,
            padding: cfg.padding,
            force_pot: cfg.force_pot,
            reorder: cfg.reorder,
            remove_padding: false,
            transparent: cfg.transparent,
            background_color: cfg.background_color,
            export_directory: String::new(),
            watch_file: false,
        }
    }
}

impl ProjectSettings {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            padding: self.padding,
            force_pot: self.force_pot,
            reorder: self.reorder,
            transparent: self.transparent,
            background_color: self.background_color,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub source_path: PathBuf,
    pub export_path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectDocument {
    version: u32,
    #[serde(default)]
    settings: ProjectSettings,
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Project {
    path: Option<PathBuf>,
    settings: ProjectSettings,
    files: Vec<FileEntry>,
    modified: bool,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let doc: ProjectDocument = serde_json::from_str(&data)?;
        if doc.version > PROJECT_VERSION {
            return Err(TilePadError::InvalidConfig(format!(
                "project version {} is newer than supported version {}",
                doc.version, PROJECT_VERSION
            )));
        }
        debug!(?path, files = doc.files.len(), "project loaded");
        Ok(Self {
            path: Some(path.to_path_buf()),
            settings: doc.settings,
            files: doc.files,
            modified: false,
        })
    }

    /// Writes the project as indented JSON and makes `path` its new location.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = ProjectDocument {
            version: PROJECT_VERSION,
            settings: self.settings.clone(),
            files: self.files.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        debug!(?path, files = self.files.len(), "project saved");
        Ok(())
    }

    /// Adds a source image and derives its export path; returns the new index.
    pub fn add_file(&mut self, source_path: impl Into<PathBuf>) -> usize {
        let source_path = source_path.into();
        let export_path = if self.settings.export_directory.is_empty() {
            default_export_path(&source_path)
        } else {
            Path::new(&self.settings.export_directory).join(export_file_name(&source_path))
        };
        self.files.push(FileEntry {
            source_path,
            export_path,
        });
        self.modified = true;
        self.files.len() - 1
    }

    /// Removes the entry at `index`; out-of-range indices are ignored.
    pub fn remove_file(&mut self, index: usize) -> Option<FileEntry> {
        if index >= self.files.len() {
            return None;
        }
        self.modified = true;
        Some(self.files.remove(index))
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ProjectSettings {
        self.modified = true;
        &mut self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Resets to an unsaved project with default settings and no files.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// `<dir>/<stem>.export.<ext>` next to the source image.
pub fn default_export_path(source: &Path) -> PathBuf {
    source.with_file_name(export_file_name(source))
}

fn export_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match source.extension() {
        Some(ext) => format!("{}.export.{}", stem, ext.to_string_lossy()),
        None => format!("{}.export", stem),
    }
}
