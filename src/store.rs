use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{error, info, warn};

use crate::db::DbPool;
use crate::models::project::Project;
use crate::models::slot::Slot;

/// Slot holding the serialized project list.
pub const DATA_SLOT: &str = "portfolioData";

/// Static document the store seeds itself from on first run.
pub const FALLBACK_PATH: &str = "website/portfolio.json";

/// Where every mutation re-exports the deployable document.
pub const EXPORT_PATH: &str = "website/export/portfolio.json";

/// Download name of the export artifact.
pub const EXPORT_FILENAME: &str = "portfolio.json";

/// Field set for an edit. `None` means the input was withdrawn (the user
/// cancelled); `Some("")` is a deliberate empty submission. Title and
/// description fall back to their previous value when submitted empty, while
/// an empty link clears the link — the asymmetry is intended.
#[derive(Debug, Default)]
pub struct ProjectEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// The portfolio list: an in-memory ordered sequence (most recent first)
/// mirrored into the `portfolioData` slot after every mutation. Owned by the
/// application root and handed to routes as managed state.
pub struct PortfolioStore {
    pool: DbPool,
    projects: RwLock<Vec<Project>>,
    export_path: PathBuf,
}

impl PortfolioStore {
    pub fn new(pool: DbPool, export_path: impl Into<PathBuf>) -> Self {
        PortfolioStore {
            pool,
            projects: RwLock::new(Vec::new()),
            export_path: export_path.into(),
        }
    }

    // ── Lifecycle ───────────────────────────────────────

    /// Populate memory from the slot, or seed from the fallback document.
    /// Every failure path degrades to an empty list; nothing here is fatal.
    pub fn load(&self) {
        self.load_with_fallback(Path::new(FALLBACK_PATH))
    }

    pub fn load_with_fallback(&self, fallback: &Path) {
        if let Some(data) = Slot::get(&self.pool, DATA_SLOT) {
            let list = match Project::decode_list(&data) {
                Ok(list) => list,
                Err(e) => {
                    error!("Corrupt {} slot, starting empty: {}", DATA_SLOT, e);
                    Vec::new()
                }
            };
            *self.projects.write().unwrap() = list;
            info!("Loaded {} project(s) from the {} slot", self.len(), DATA_SLOT);
            return;
        }

        *self.projects.write().unwrap() = read_fallback(fallback);
        info!(
            "No {} slot; seeded {} project(s) from {}",
            DATA_SLOT,
            self.len(),
            fallback.display()
        );
        self.persist();
    }

    /// Serialize memory into the slot. Side effect only.
    pub fn persist(&self) {
        let data = Project::encode_list(&self.projects.read().unwrap());
        if let Err(e) = Slot::set(&self.pool, DATA_SLOT, &data) {
            warn!("Failed to persist {} slot: {}", DATA_SLOT, e);
        }
    }

    // ── Mutators ────────────────────────────────────────

    /// Insert at the front: the list is most-recently-added first.
    pub fn add(&self, project: Project) {
        self.projects.write().unwrap().insert(0, project);
        self.persist();
        self.export();
    }

    /// Apply an edit. A withdrawn title or description cancels the whole
    /// operation; see [`ProjectEdit`] for the field semantics.
    pub fn edit(&self, index: usize, edit: ProjectEdit) -> Result<(), String> {
        let (Some(title), Some(description)) = (edit.title, edit.description) else {
            return Ok(());
        };

        {
            let mut projects = self.projects.write().unwrap();
            let project = projects
                .get_mut(index)
                .ok_or_else(|| format!("No project at index {}", index))?;

            let title = title.trim();
            if !title.is_empty() {
                project.title = title.to_string();
            }
            let description = description.trim();
            if !description.is_empty() {
                project.description = description.to_string();
            }
            if let Some(link) = edit.link {
                project.link = link.trim().to_string();
            }
        }

        self.persist();
        self.export();
        Ok(())
    }

    /// Remove one element. Callers present the confirmation step; by the
    /// time this runs the user has acknowledged it.
    pub fn delete(&self, index: usize) -> Result<(), String> {
        {
            let mut projects = self.projects.write().unwrap();
            if index >= projects.len() {
                return Err(format!("No project at index {}", index));
            }
            projects.remove(index);
        }

        self.persist();
        self.export();
        Ok(())
    }

    /// Drop the in-memory list only; the slot is untouched. Used on logout
    /// so the next load starts fresh.
    pub fn clear(&self) {
        self.projects.write().unwrap().clear();
    }

    // ── Export ──────────────────────────────────────────

    /// Pretty-print the list, rewrite the export artifact, and return the
    /// serialized text for download delivery. Convenience side effect; the
    /// slot written by `persist` is the real persistence path.
    pub fn export(&self) -> String {
        let text = Project::encode_list_pretty(&self.projects.read().unwrap());
        if let Some(parent) = self.export_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&self.export_path, &text) {
            warn!(
                "Failed to write export artifact {}: {}",
                self.export_path.display(),
                e
            );
        }
        text
    }

    // ── Read access ─────────────────────────────────────

    pub fn snapshot(&self) -> Vec<Project> {
        self.projects.read().unwrap().clone()
    }

    pub fn get(&self, index: usize) -> Option<Project> {
        self.projects.read().unwrap().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.projects.read().unwrap().len()
    }
}

/// Read the fallback document. Any read or parse failure is logged and
/// treated as an empty portfolio — first runs on a fresh host are normal.
fn read_fallback(path: &Path) -> Vec<Project> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Fallback document {} unreadable: {}", path.display(), e);
            return Vec::new();
        }
    };

    match Project::decode_list(&text) {
        Ok(list) => list,
        Err(e) => {
            error!("Fallback document {} invalid: {}", path.display(), e);
            Vec::new()
        }
    }
}
