//! OrbitCamera component and systems: left-drag rotates, right-drag pans, wheel zooms.

use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::scene::SceneBounds;

const ROTATE_SPEED: f32 = 0.005;
const PAN_SPEED: f32 = 0.0015;
const ZOOM_STEP: f32 = 0.1;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const MIN_RADIUS: f32 = 0.01;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Set once the camera has been fitted to the first scene.
    pub framed: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: 5.0,
            yaw: 0.6,
            pitch: 0.5,
            framed: false,
        }
    }
}

impl OrbitCamera {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        Transform::from_translation(self.focus + rotation * Vec3::Z * self.radius)
            .looking_at(self.focus, Vec3::Y)
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ROTATE_SPEED;
        self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves the focus in the view plane, proportionally to the distance.
    pub fn pan(&mut self, delta: Vec2) {
        let transform = self.transform();
        let scale = self.radius * PAN_SPEED;
        self.focus += (*transform.left() * delta.x + *transform.up() * delta.y) * scale;
    }

    pub fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * (1.0 - ZOOM_STEP).powf(lines)).max(MIN_RADIUS);
    }

    /// Centres on the box and backs off far enough to see all of it.
    pub fn frame(&mut self, min: Vec3, max: Vec3) {
        self.focus = (min + max) * 0.5;
        self.radius = ((max - min).length() * 1.2).max(1.0);
        self.framed = true;
    }
}

pub fn orbit_camera_plugin(app: &mut App) {
    app.add_systems(Update, (frame_camera_system, orbit_camera_system).chain());
}

fn frame_camera_system(bounds: Res<SceneBounds>, mut query: Query<&mut OrbitCamera>) {
    let Some((min, max)) = bounds.0 else {
        return;
    };
    for mut camera in &mut query {
        if !camera.framed {
            camera.frame(min, max);
        }
    }
}

fn orbit_camera_system(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let scroll: f32 = wheel
        .read()
        .map(|w| match w.unit {
            MouseScrollUnit::Line => w.y,
            MouseScrollUnit::Pixel => w.y / 40.0,
        })
        .sum();

    for (mut camera, mut transform) in &mut query {
        if buttons.pressed(MouseButton::Left) {
            camera.rotate(delta);
        } else if buttons.pressed(MouseButton::Right) {
            camera.pan(delta);
        }
        if scroll != 0.0 {
            camera.zoom(scroll);
        }
        if camera.is_changed() {
            *transform = camera.transform();
        }
    }
}
