//! Plan explorer: 3D visualization of motion-planner dumps (EST, k-d trees,
//! world trees, mesh objects) and a replayer for recorded planner requests.
//!
//! Library root: data, geometry, SDK builder, replay and config modules.

mod camera;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod render;
pub mod replay;
mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

pub use data::{load_est, load_world_tree, SceneSource, Session};
pub use error::{ExplorerError, Result};
pub use geometry::{Scene, VisualSettings, WorldTreeOverlay};
pub use replay::{ReplayPlan, Replayer};
