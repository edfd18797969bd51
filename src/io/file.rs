use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::model::{Connection, Delivery, Funnel, Segment};
use crate::timeline::FunnelStore;

pub const FILE_EXTENSION: &str = "funnel.json";

/// Save a funnel to a JSON file.
pub fn save_funnel(funnel: &Funnel, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(funnel).context("serializing funnel")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved funnel '{}' to {}", funnel.name, path.display());
    Ok(())
}

/// Load a funnel from a JSON file.
pub fn load_funnel(path: &Path) -> anyhow::Result<Funnel> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let funnel: Funnel = serde_json::from_str(&json)
        .with_context(|| format!("parsing funnel {}", path.display()))?;
    log::info!(
        "loaded funnel '{}' ({} deliveries) from {}",
        funnel.name,
        funnel.deliveries.len(),
        path.display()
    );
    Ok(funnel)
}

/// Owns the funnel document behind the timeline. Every commit lands here;
/// with `autosave` on and a path set it is written straight to disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    pub funnel: Funnel,
    pub path: Option<PathBuf>,
    pub autosave: bool,
    dirty: bool,
}

impl FileStore {
    pub fn new(funnel: Funnel, path: Option<PathBuf>, autosave: bool) -> Self {
        Self {
            funnel,
            path,
            autosave,
            dirty: false,
        }
    }

    pub fn open(path: &Path, autosave: bool) -> anyhow::Result<Self> {
        let funnel = load_funnel(path)?;
        Ok(Self::new(funnel, Some(path.to_path_buf()), autosave))
    }

    /// Changes not yet written to `path`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.funnel.touch();
        self.dirty = true;
    }

    /// Write to the current path. Errors when there is none yet.
    pub fn save(&mut self) -> anyhow::Result<()> {
        let path = self
            .path
            .clone()
            .context("funnel has no file yet; use Save As")?;
        self.save_as(&path)
    }

    pub fn save_as(&mut self, path: &Path) -> anyhow::Result<()> {
        save_funnel(&self.funnel, path)?;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// Record a change to the funnel and autosave it if enabled.
    pub fn changed(&mut self) -> anyhow::Result<()> {
        self.mark_dirty();
        if self.autosave && self.path.is_some() {
            self.save()?;
        }
        Ok(())
    }
}

impl FunnelStore for FileStore {
    fn update(&mut self, deliveries: &[Delivery], connections: &[Connection]) -> anyhow::Result<()> {
        self.funnel.deliveries = deliveries.to_vec();
        self.funnel.connections = connections.to_vec();
        self.changed()
    }

    fn update_segments(&mut self, segments: &[Segment]) -> anyhow::Result<()> {
        self.funnel.segments = segments.to_vec();
        self.changed()
    }
}
