//! Test helpers for writing datasets and weight files to temporary
//! workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub(super) const NOW: &str = "2024-06-01T12:00:00Z";

const DATASET: &str = r#"{
    "users": [
        {"_id": "ana", "neighborhood": "downtown", "city": "springfield",
         "preferred_cuisines": ["thai"], "dining_frequency": "weekly"},
        {"_id": "ben", "neighborhood": "uptown", "city": "springfield",
         "preferred_cuisines": ["italian"]},
        {"_id": "cat", "neighborhood": "downtown", "city": "springfield", "active": false}
    ],
    "restaurants": [
        {"_id": "r-thai", "name": "Thai House", "neighborhood": "downtown",
         "city": "springfield", "cuisines": ["thai"], "average_rating": 4.5},
        {"_id": "r-pizza", "name": "Slice", "neighborhood": "uptown",
         "city": "springfield", "cuisines": ["italian"], "average_rating": 4.0}
    ],
    "visits": [
        {"user_id": "ben", "restaurant_id": "r-pizza", "visit_date": "2024-05-22T19:30:00Z"}
    ]
}"#;

/// Temporary directory holding CLI inputs.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn dataset(&self) -> Utf8PathBuf {
        let path = self.root.join("dataset.json");
        write_utf8(&path, DATASET.as_bytes());
        path
    }

    pub(super) fn file(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) fn now() -> Option<chrono::DateTime<chrono::Utc>> {
    crate::inputs::parse_now(Some(NOW)).expect("valid timestamp")
}

pub(super) fn decode(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("command output should be JSON")
}
