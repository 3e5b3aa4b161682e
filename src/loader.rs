use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::collab::{AssetLoader, LoadEvent};
use crate::schema::ConfigurationSchema;

/// File-system [`AssetLoader`].
///
/// `begin` resolves the whole load eagerly and queues the reports; `poll` releases at most
/// `per_poll` of them, so progress still surfaces across frames. Like a loading manager, it keeps
/// reporting after a failure and always finishes with [`LoadEvent::Completed`].
#[derive(Debug)]
pub struct FsLoader {
    asset_root: PathBuf,
    required: Vec<PathBuf>,
    per_poll: usize,
    queued: VecDeque<LoadEvent>,
}

impl FsLoader {
    /// `required` paths are resolved against `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>, required: Vec<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            required,
            per_poll: 1,
            queued: VecDeque::new(),
        }
    }

    pub fn with_per_poll(mut self, per_poll: usize) -> Self {
        self.per_poll = per_poll.max(1);
        self
    }
}

impl AssetLoader for FsLoader {
    #[tracing::instrument(skip(self))]
    fn begin(&mut self, schema_path: &Path) {
        let total = self.required.len() + 1;
        let schema_item = schema_path.display().to_string();

        match ConfigurationSchema::from_path(schema_path) {
            Ok(schema) => {
                self.queued.push_back(LoadEvent::Progress {
                    item: schema_item,
                    loaded: 1,
                    total,
                });
                self.queued.push_back(LoadEvent::SchemaReady(schema));
            }
            Err(e) => {
                tracing::warn!(error = %e, "schema fetch failed");
                self.queued.push_back(LoadEvent::Failed { item: schema_item });
            }
        }

        for (i, rel) in self.required.iter().enumerate() {
            let item = rel.display().to_string();
            if self.asset_root.join(rel).is_file() {
                self.queued.push_back(LoadEvent::Progress {
                    item,
                    loaded: i + 2,
                    total,
                });
            } else {
                self.queued.push_back(LoadEvent::Failed { item });
            }
        }
        self.queued.push_back(LoadEvent::Completed);
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        let n = self.per_poll.min(self.queued.len());
        self.queued.drain(..n).collect()
    }
}
