//! Recorded request fixtures: `<prefix>_<index>_<target>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;

use crate::error::{ExplorerError, Result};

/// Parsed fixture file name. Only the index and the target matter;
/// anything after the target segment is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureName {
    pub index: u64,
    pub target: String,
}

impl FixtureName {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = || ExplorerError::FixtureName {
            name: name.to_string(),
        };
        let stem = name.split('.').next().unwrap_or_default();
        let mut parts = stem.split('_');
        let _prefix = parts.next().ok_or_else(invalid)?;
        let index = parts
            .next()
            .and_then(|i| i.parse::<u64>().ok())
            .ok_or_else(invalid)?;
        let target = parts.next().filter(|t| !t.is_empty()).ok_or_else(invalid)?;
        Ok(Self {
            index,
            target: target.to_string(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub path: PathBuf,
    pub name: FixtureName,
    /// The captured request body, byte for byte.
    pub body: String,
}

/// Fixtures of one directory, in index order.
#[derive(Clone, Debug, Default)]
pub struct ReplayPlan {
    pub fixtures: Vec<Fixture>,
}

impl ReplayPlan {
    /// Reads every `.json` file in `dir`. Bodies are checked to be JSON up front
    /// so a broken fixture fails the plan before anything is sent.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| ExplorerError::io(dir, e))?;
        let mut fixtures = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ExplorerError::io(dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let name = FixtureName::parse(&file_name)?;
            let body = fs::read_to_string(&path).map_err(|e| ExplorerError::io(&path, e))?;
            serde_json::from_str::<IgnoredAny>(&body).map_err(|e| ExplorerError::json(&path, e))?;
            fixtures.push(Fixture { path, name, body });
        }
        fixtures.sort_by_key(|f| f.name.index);
        tracing::debug!("{} fixtures in {}", fixtures.len(), dir.display());
        Ok(Self { fixtures })
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_and_target() {
        let name = FixtureName::parse("request_12_solve.json").unwrap();
        assert_eq!(name.index, 12);
        assert_eq!(name.target, "solve");
    }

    #[test]
    fn ignores_trailing_segments() {
        let name = FixtureName::parse("req_3_update_extra.json").unwrap();
        assert_eq!(name.index, 3);
        assert_eq!(name.target, "update");
    }

    #[test]
    fn rejects_non_numeric_index_and_missing_target() {
        assert!(matches!(
            FixtureName::parse("req_x_solve.json"),
            Err(ExplorerError::FixtureName { .. })
        ));
        assert!(FixtureName::parse("req_4.json").is_err());
        assert!(FixtureName::parse("req_4_.json").is_err());
        assert!(FixtureName::parse("plain.json").is_err());
    }

    #[test]
    fn plan_sorts_numerically_and_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r_10_solve.json"), r#"{"a":10}"#).unwrap();
        fs::write(dir.path().join("r_2_update.json"), r#"{"a":2}"#).unwrap();
        fs::write(dir.path().join("r_1_init.json"), r#"{"a":1}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a fixture").unwrap();

        let plan = ReplayPlan::from_dir(dir.path()).unwrap();
        let order: Vec<_> = plan.fixtures.iter().map(|f| f.name.index).collect();

        assert_eq!(order, vec![1, 2, 10]);
        assert_eq!(plan.fixtures[2].body, r#"{"a":10}"#);
    }

    #[test]
    fn plan_fails_on_badly_named_fixture() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r_1_init.json"), "{}").unwrap();
        fs::write(dir.path().join("broken.json"), "{}").unwrap();

        let err = ReplayPlan::from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn plan_fails_on_invalid_json_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r_1_init.json"), "{not json").unwrap();

        let err = ReplayPlan::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ExplorerError::Json { .. }));
        assert!(err.to_string().contains("r_1_init.json"));
    }
}
