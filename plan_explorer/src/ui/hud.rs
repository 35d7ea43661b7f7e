//! HUD overlay: per-dump statistics, primitive counts, FPS counter, key bindings.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::scene::SceneRegistry;

const KEY_BINDINGS: [&str; 5] = [
    "LMB drag  rotate",
    "RMB drag  pan",
    "Wheel     zoom",
    "Space     screenshot",
    "X         toggle axes",
];

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_systems(Update, hud_overlay_system);
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    registry: Option<Res<SceneRegistry>>,
    diagnostics: Res<DiagnosticsStore>,
) {
    let Some(registry) = registry else {
        return;
    };
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Window::new("Plan Explorer")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(245, 245, 245, 220))
                .inner_margin(egui::Margin::same(10))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(30, 30, 40));

            if registry.entries.is_empty() {
                ui.label("loading...");
            }
            for entry in &registry.entries {
                ui.label(
                    egui::RichText::new(&entry.label)
                        .size(15.0)
                        .color(egui::Color32::from_rgb(0, 110, 60)),
                );
                for summary in &entry.summaries {
                    ui.label(summary.to_string());
                }
                ui.label(format!(
                    "{} points  {} lines  {} boxes  {} meshes",
                    entry.counts.points, entry.counts.lines, entry.counts.boxes, entry.counts.meshes
                ));
                ui.add_space(4.0);
            }

            ui.separator();
            ui.label(format!("Primitives  {}", registry.total_primitives()));
            ui.label(format!("FPS  {fps:.0}"));
            ui.add_space(4.0);
            for binding in KEY_BINDINGS {
                ui.label(egui::RichText::new(binding).size(11.0));
            }
        });
}
