//! Edges and k-d cells drawn with gizmos, one config group per stroke weight.

use bevy::prelude::*;

use crate::geometry::LineWeight;
use crate::scene::SceneBounds;

const THIN_WIDTH: f32 = 1.5;
const BOLD_WIDTH: f32 = 3.5;
const HEAVY_WIDTH: f32 = 7.0;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ThinLines;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct BoldLines;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct HeavyLines;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
    pub weight: LineWeight,
}

/// Every segment of every ingested scene, redrawn each frame.
#[derive(Resource, Default)]
pub struct LineSet {
    segments: Vec<Segment>,
}

impl LineSet {
    pub fn push_line(&mut self, from: Vec3, to: Vec3, color: Color, weight: LineWeight) {
        self.segments.push(Segment {
            from,
            to,
            color,
            weight,
        });
    }

    pub fn push_box(&mut self, min: Vec3, max: Vec3, color: Color, weight: LineWeight) {
        for (from, to) in box_edges(min, max) {
            self.push_line(from, to, color, weight);
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// The twelve edges of an axis-aligned box.
pub fn box_edges(min: Vec3, max: Vec3) -> [(Vec3, Vec3); 12] {
    let corner = |x: bool, y: bool, z: bool| {
        Vec3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };
    [
        // bottom face
        (corner(false, false, false), corner(true, false, false)),
        (corner(true, false, false), corner(true, true, false)),
        (corner(true, true, false), corner(false, true, false)),
        (corner(false, true, false), corner(false, false, false)),
        // top face
        (corner(false, false, true), corner(true, false, true)),
        (corner(true, false, true), corner(true, true, true)),
        (corner(true, true, true), corner(false, true, true)),
        (corner(false, true, true), corner(false, false, true)),
        // uprights
        (corner(false, false, false), corner(false, false, true)),
        (corner(true, false, false), corner(true, false, true)),
        (corner(true, true, false), corner(true, true, true)),
        (corner(false, true, false), corner(false, true, true)),
    ]
}

/// Origin axes, toggled with `X`.
#[derive(Resource)]
pub struct AxesSettings {
    pub enabled: bool,
}

impl Default for AxesSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub fn line_plugin(app: &mut App) {
    app.init_gizmo_group::<ThinLines>()
        .init_gizmo_group::<BoldLines>()
        .init_gizmo_group::<HeavyLines>()
        .init_resource::<LineSet>()
        .init_resource::<AxesSettings>()
        .add_systems(Startup, configure_line_widths)
        .add_systems(
            Update,
            (draw_lines_system, toggle_axes_system, draw_axes_system),
        );
}

fn configure_line_widths(mut store: ResMut<GizmoConfigStore>) {
    let (thin, _) = store.config_mut::<ThinLines>();
    thin.line_width = THIN_WIDTH;
    let (bold, _) = store.config_mut::<BoldLines>();
    bold.line_width = BOLD_WIDTH;
    let (heavy, _) = store.config_mut::<HeavyLines>();
    heavy.line_width = HEAVY_WIDTH;
}

fn draw_lines_system(
    set: Res<LineSet>,
    mut thin: Gizmos<ThinLines>,
    mut bold: Gizmos<BoldLines>,
    mut heavy: Gizmos<HeavyLines>,
) {
    for segment in set.segments() {
        match segment.weight {
            LineWeight::Thin => thin.line(segment.from, segment.to, segment.color),
            LineWeight::Bold => bold.line(segment.from, segment.to, segment.color),
            LineWeight::Heavy => heavy.line(segment.from, segment.to, segment.color),
        }
    }
}

fn toggle_axes_system(keys: Res<ButtonInput<KeyCode>>, mut settings: ResMut<AxesSettings>) {
    if keys.just_pressed(KeyCode::KeyX) {
        settings.enabled = !settings.enabled;
    }
}

fn draw_axes_system(mut gizmos: Gizmos, settings: Res<AxesSettings>, bounds: Res<SceneBounds>) {
    if !settings.enabled {
        return;
    }
    let length = bounds
        .0
        .map(|(lo, hi)| lo.abs().max(hi.abs()).max_element())
        .filter(|l| *l > 0.0)
        .unwrap_or(1.0);
    gizmos.line(Vec3::ZERO, Vec3::X * length, Color::srgb(0.8, 0.1, 0.1));
    gizmos.line(Vec3::ZERO, Vec3::Y * length, Color::srgb(0.1, 0.6, 0.1));
    gizmos.line(Vec3::ZERO, Vec3::Z * length, Color::srgb(0.1, 0.1, 0.8));
}
