use super::files::FileSource;
use super::filesystem::list_files;
use crate::refresh::Invalidation;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Content digests of every file behind a [`FileSource`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFingerprint {
    pub interviews: String,
    pub jobs: String,
    pub activities: String,
    pub attempts: String,
    pub checklists: BTreeMap<String, String>,
}

impl SourceFingerprint {
    pub fn capture(source: &FileSource) -> Self {
        let root = source.root();
        let paths = source.paths();
        let checklists = list_files(&root.join(&paths.checklists))
            .into_iter()
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .filter_map(|path| {
                let id = path.file_stem()?.to_str()?.to_string();
                Some((id, file_digest(&path)))
            })
            .collect();

        Self {
            interviews: file_digest(&root.join(&paths.interviews)),
            jobs: file_digest(&root.join(&paths.jobs)),
            activities: file_digest(&root.join(&paths.activities)),
            attempts: file_digest(&root.join(&paths.attempts)),
            checklists,
        }
    }

    /// Signals describing what differs from `previous`, in a stable order.
    pub fn changes_since(&self, previous: &SourceFingerprint) -> Vec<Invalidation> {
        let mut changes = Vec::new();
        if self.interviews != previous.interviews {
            changes.push(Invalidation::Interviews);
        }
        if self.jobs != previous.jobs {
            changes.push(Invalidation::Jobs);
        }
        if self.activities != previous.activities {
            changes.push(Invalidation::Activities);
        }
        if self.attempts != previous.attempts {
            changes.push(Invalidation::Attempts);
        }

        let ids: BTreeSet<&String> = self
            .checklists
            .keys()
            .chain(previous.checklists.keys())
            .collect();
        for id in ids {
            if self.checklists.get(id) != previous.checklists.get(id) {
                changes.push(Invalidation::Checklist(id.clone()));
            }
        }
        changes
    }
}

fn file_digest(path: &Path) -> String {
    let mut hasher = Sha256::new();
    match std::fs::read(path) {
        Ok(bytes) => {
            hasher.update(b"present\0");
            hasher.update(&bytes);
        }
        Err(_) => hasher.update(b"absent\0"),
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
