pub(crate) mod ingest;
pub(crate) mod lines;
pub(crate) mod materials;
pub(crate) mod screenshot;

pub use ingest::{
    ingest_scenes, setup_scene, SceneBounds, SceneEntry, ScenePrimitive, SceneRegistry,
};
pub use lines::{box_edges, line_plugin, AxesSettings, LineSet, Segment};
pub use materials::MaterialCache;
pub use screenshot::{screenshot_key_plugin, screenshot_plugin, ScreenshotKey, ScreenshotMode};
