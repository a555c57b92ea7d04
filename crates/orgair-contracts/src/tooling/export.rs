use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ExportConfig;
use crate::contracts::EntityKind;
use crate::error::AppError;

/// Writes structural schemas to `<root>/<version>/exports/<entity>_<version>.json`.
#[derive(Debug, Clone)]
pub struct SchemaExporter {
    root: PathBuf,
    version: String,
}

impl SchemaExporter {
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.schema_dir.clone(), config.version.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn export_dir(&self) -> PathBuf {
        self.root.join(&self.version).join("exports")
    }

    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.export_dir()
            .join(format!("{}_{}.json", kind.slug(), self.version))
    }

    pub fn export(&self, kind: EntityKind) -> Result<PathBuf, AppError> {
        fs::create_dir_all(self.export_dir())?;
        let path = self.path_for(kind);
        let mut rendered = serde_json::to_string_pretty(&kind.schema())?;
        rendered.push('\n');
        fs::write(&path, rendered)?;
        tracing::info!(entity = %kind, path = %path.display(), "exported schema");
        Ok(path)
    }

    pub fn export_all(&self) -> Result<Vec<PathBuf>, AppError> {
        EntityKind::ordered()
            .into_iter()
            .map(|kind| self.export(kind))
            .collect()
    }
}
