//! Request replayer: sends recorded fixtures to the planner's HTTP service.

mod client;
mod fixture;

pub use client::{ReplayReport, ReplayResponse, Replayer};
pub use fixture::{Fixture, FixtureName, ReplayPlan};
