//! Error type shared by loaders, geometry walks and the replayer.

use std::path::PathBuf;

pub type Result<T, E = ExplorerError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("http request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid url {raw:?}: {source}")]
    Url {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("fixture name {name:?} does not match <prefix>_<index>_<target>.json")]
    FixtureName { name: String },
    #[error("no EST dumps found in {}{}", .dir.display(), session_suffix(.session))]
    NoSession { dir: PathBuf, session: Option<u64> },
    #[error("node {node} names parent {parent}, but the tree has only {len} nodes")]
    DanglingParent { node: usize, parent: usize, len: usize },
    #[error("parent chain starting at node {start} never reaches a root")]
    ParentCycle { start: usize },
    #[error("index {index} is out of range for a tree of {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },
}

fn session_suffix(session: &Option<u64>) -> String {
    match session {
        Some(id) => format!(" for session {id}"),
        None => String::new(),
    }
}

impl ExplorerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
