use std::path::PathBuf;

use crossbeam_channel::Receiver;

use crate::data::{load_est, load_world_tree, EstDump, Session};
use crate::error::Result;
use crate::geometry::{
    compose_session, compose_world_tree, Scene, VisualSettings, WorldTreeOverlay,
};

/// Bevy resource holding the channel from the loader thread.
/// Systems drain this in ingest_scenes.
#[derive(bevy::prelude::Resource)]
pub struct SceneChannel(pub Receiver<Scene>);

/// What a viewer invocation loads.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneSource {
    /// Every dump of a session found in `dir`; the newest session when `session` is `None`.
    Session { dir: PathBuf, session: Option<u64> },
    /// Explicit EST dumps, drawn together as one session.
    EstFiles(Vec<PathBuf>),
    /// A world tree with an optional EST drawn on top.
    WorldTree {
        tree: PathBuf,
        est: Option<PathBuf>,
        overlay: WorldTreeOverlay,
    },
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_dumps(files: &[PathBuf]) -> Result<Vec<(String, EstDump)>> {
    files
        .iter()
        .map(|path| Ok((file_label(path), load_est(path)?)))
        .collect()
}

impl SceneSource {
    /// Reads the source's files and derives its geometry.
    pub fn load(&self, settings: &VisualSettings) -> Result<Scene> {
        match self {
            Self::Session { dir, session } => {
                let session = Session::discover(dir, *session)?;
                let dumps = load_dumps(&session.files)?;
                compose_session(format!("session {}", session.id), &dumps, settings)
            }
            Self::EstFiles(files) => {
                let dumps = load_dumps(files)?;
                let label = match files.as_slice() {
                    [single] => file_label(single),
                    _ => format!("{} EST dumps", files.len()),
                };
                compose_session(label, &dumps, settings)
            }
            Self::WorldTree { tree, est, overlay } => {
                let world = load_world_tree(tree)?;
                let est = match est {
                    Some(path) => Some((file_label(path), load_est(path)?)),
                    None => None,
                };
                compose_world_tree(
                    file_label(tree),
                    &world,
                    est.as_ref().map(|(name, dump)| (name.as_str(), dump)),
                    *overlay,
                    settings,
                )
            }
        }
    }
}

/// Load every source on a dedicated thread and stream finished scenes.
/// A source that fails to load is logged and skipped.
pub fn spawn_loader(sources: Vec<SceneSource>, settings: VisualSettings) -> Receiver<Scene> {
    let (tx, rx) = crossbeam_channel::bounded(4);
    std::thread::spawn(move || {
        for source in sources {
            match source.load(&settings) {
                Ok(scene) => {
                    let counts = scene.counts();
                    tracing::info!(
                        scene = %scene.label,
                        primitives = counts.total(),
                        points = counts.points,
                        lines = counts.lines,
                        boxes = counts.boxes,
                        meshes = counts.meshes,
                        "scene ready"
                    );
                    if tx.send(scene).is_err() {
                        return;
                    }
                }
                Err(err) => tracing::error!("failed to load {source:?}: {err}"),
            }
        }
    });
    rx
}

/// Create a scene channel and spawn the loader thread.
pub fn init_scene_channel(sources: Vec<SceneSource>, settings: VisualSettings) -> SceneChannel {
    SceneChannel(spawn_loader(sources, settings))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const EST: &str = r#"{
        "EST": {"Nodes": [
            {"Config": {"Position": [0,0,0], "Rotation": [1,0,0,0]}, "Rating": 0, "Parent": 0, "IsRoot": true},
            {"Config": {"Position": [1,0,0], "Rotation": [1,0,0,0]}, "Rating": 0, "Parent": 0, "IsRoot": false}
        ]},
        "KDTree": null,
        "CompleteSolution": false,
        "Objects": []
    }"#;

    #[test]
    fn loader_skips_broken_sources_and_streams_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("est-5-1.json"), EST).unwrap();

        let rx = spawn_loader(
            vec![
                SceneSource::EstFiles(vec![dir.path().join("missing.json")]),
                SceneSource::Session {
                    dir: dir.path().to_path_buf(),
                    session: None,
                },
            ],
            VisualSettings::default(),
        );

        let scene = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(scene.label, "session 5");
        assert_eq!(scene.counts().lines, 1);
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
    }

    #[test]
    fn single_file_scene_is_labelled_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("est-5-1.json");
        std::fs::write(&path, EST).unwrap();

        let scene = SceneSource::EstFiles(vec![path])
            .load(&VisualSettings::default())
            .unwrap();
        assert_eq!(scene.label, "est-5-1.json");
        assert_eq!(scene.summaries[0].nodes, 2);
    }
}
