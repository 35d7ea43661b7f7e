//! Screenshots: `Space` saves the current view; auto mode captures after N frames and exits.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot, ScreenshotCaptured};

/// Where the `Space` key writes its screenshot.
#[derive(Resource, Clone, Debug)]
pub struct ScreenshotKey {
    pub path: PathBuf,
}

impl Default for ScreenshotKey {
    fn default() -> Self {
        Self {
            path: PathBuf::from("graph.png"),
        }
    }
}

/// Resource controlling automatic screenshot capture.
/// Counts down frames, requests a screenshot, waits for it to be written, then exits.
#[derive(Resource)]
pub struct ScreenshotMode {
    pub path: PathBuf,
    pub frames_remaining: u32,
    pub requested: bool,
    /// Set by the capture observer once the image is on disk.
    pub saved: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum CaptureStep {
    Wait,
    Request,
    Exit,
}

impl ScreenshotMode {
    pub fn new(path: PathBuf, delay_frames: u32) -> Self {
        Self {
            path,
            frames_remaining: delay_frames,
            requested: false,
            saved: false,
        }
    }

    fn tick(&mut self) -> CaptureStep {
        if self.saved {
            return CaptureStep::Exit;
        }
        if self.requested {
            return CaptureStep::Wait;
        }
        if self.frames_remaining > 0 {
            self.frames_remaining -= 1;
            return CaptureStep::Wait;
        }
        self.requested = true;
        CaptureStep::Request
    }
}

fn mark_saved(_trigger: Trigger<ScreenshotCaptured>, mut mode: ResMut<ScreenshotMode>) {
    mode.saved = true;
}

pub fn auto_screenshot_system(
    mut commands: Commands,
    mut mode: ResMut<ScreenshotMode>,
    mut exit: EventWriter<AppExit>,
) {
    match mode.tick() {
        CaptureStep::Wait => {}
        CaptureStep::Request => {
            info!("capturing screenshot to {}", mode.path.display());
            commands
                .spawn(Screenshot::primary_window())
                .observe(save_to_disk(mode.path.clone()))
                .observe(mark_saved);
        }
        CaptureStep::Exit => {
            exit.send(AppExit::Success);
        }
    }
}

pub fn screenshot_key_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    target: Res<ScreenshotKey>,
) {
    if keys.just_pressed(KeyCode::Space) {
        info!("saving screenshot to {}", target.path.display());
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(target.path.clone()));
    }
}

pub fn screenshot_plugin(app: &mut App) {
    app.add_systems(Update, auto_screenshot_system);
}

pub fn screenshot_key_plugin(app: &mut App) {
    app.init_resource::<ScreenshotKey>()
        .add_systems(Update, screenshot_key_system);
}
