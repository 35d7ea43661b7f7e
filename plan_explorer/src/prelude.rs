//! Minimal prelude for SDK consumers.

pub use crate::config::{host, visual_settings};
pub use crate::data::{EstDump, SceneSource, Session, WorldTree};
pub use crate::geometry::{Primitive, Scene, VisualSettings, WorldTreeOverlay};
pub use crate::render::{PrimitiveRenderer, SceneRenderer};
pub use crate::replay::{FixtureName, ReplayPlan, Replayer};
pub use crate::sdk::PlanExplorerBuilder;
