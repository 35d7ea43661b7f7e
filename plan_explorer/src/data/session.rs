//! Locating the EST dumps of one planner session.
//!
//! The planner writes one `est-<session>-<counter>.json` per exploration. A
//! session id is the planner's start timestamp, so the newest session is the
//! numerically largest id.

use std::path::{Path, PathBuf};

use crate::error::{ExplorerError, Result};

/// All dumps of one session, ordered by exploration counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: u64,
    pub files: Vec<PathBuf>,
}

/// Parses `est-<session>-<counter>.json` into `(session, counter)`.
pub fn parse_dump_name(name: &str) -> Option<(u64, u64)> {
    if name.contains("kd") || name.contains("request") {
        return None;
    }
    let stem = name.strip_suffix(".json")?.strip_prefix("est-")?;
    let (session, counter) = stem.split_once('-')?;
    Some((session.parse().ok()?, counter.parse().ok()?))
}

impl Session {
    /// Finds the dumps of `session` in `dir`, or of the newest session when `None`.
    pub fn discover(dir: &Path, session: Option<u64>) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| ExplorerError::io(dir, e))?;

        let mut dumps: Vec<(u64, u64, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ExplorerError::io(dir, e))?;
            let name = entry.file_name();
            let Some((id, counter)) = name.to_str().and_then(parse_dump_name) else {
                continue;
            };
            dumps.push((id, counter, entry.path()));
        }

        let chosen = session.or_else(|| dumps.iter().map(|(id, _, _)| *id).max());
        let Some(id) = chosen else {
            return Err(ExplorerError::NoSession {
                dir: dir.to_path_buf(),
                session,
            });
        };

        let mut files: Vec<(u64, PathBuf)> = dumps
            .into_iter()
            .filter(|(sid, _, _)| *sid == id)
            .map(|(_, counter, path)| (counter, path))
            .collect();
        if files.is_empty() {
            return Err(ExplorerError::NoSession {
                dir: dir.to_path_buf(),
                session,
            });
        }
        files.sort_by_key(|(counter, _)| *counter);

        tracing::debug!(session = id, dumps = files.len(), "discovered EST session");
        Ok(Self {
            id,
            files: files.into_iter().map(|(_, path)| path).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").unwrap();
    }

    #[test]
    fn parse_dump_name_accepts_est_dumps_only() {
        assert_eq!(parse_dump_name("est-1645881041-1.json"), Some((1645881041, 1)));
        assert_eq!(parse_dump_name("est-1645881041-12.json"), Some((1645881041, 12)));
        assert_eq!(parse_dump_name("est-1645881041-kd.json"), None);
        assert_eq!(parse_dump_name("est-1645881041-1.request.json"), None);
        assert_eq!(parse_dump_name("world_tree.json"), None);
        assert_eq!(parse_dump_name("est-abc-1.json"), None);
    }

    #[test]
    fn newest_session_is_chosen_and_sorted_by_counter() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "est-100-1.json");
        touch(dir.path(), "est-200-10.json");
        touch(dir.path(), "est-200-2.json");
        touch(dir.path(), "world_tree.json");

        let session = Session::discover(dir.path(), None).unwrap();

        assert_eq!(session.id, 200);
        let names: Vec<_> = session
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["est-200-2.json", "est-200-10.json"]);
    }

    #[test]
    fn explicit_session_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "est-100-1.json");
        touch(dir.path(), "est-200-1.json");

        let session = Session::discover(dir.path(), Some(100)).unwrap();
        assert_eq!(session.id, 100);
        assert_eq!(session.files.len(), 1);
    }

    #[test]
    fn missing_session_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "est-100-1.json");

        let err = Session::discover(dir.path(), Some(7)).unwrap_err();
        assert!(matches!(err, ExplorerError::NoSession { session: Some(7), .. }));

        let empty = tempfile::tempdir().unwrap();
        let err = Session::discover(empty.path(), None).unwrap_err();
        assert!(matches!(err, ExplorerError::NoSession { session: None, .. }));
    }
}
