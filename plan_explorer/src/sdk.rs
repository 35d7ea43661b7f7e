//! SDK entry points and builder for composing the plan explorer app.

use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::camera::orbit_camera_plugin;
use crate::data::{init_scene_channel, SceneSource};
use crate::geometry::VisualSettings;
use crate::render::{PrimitiveRenderer, RendererResource, SceneRenderer};
use crate::scene::{
    ingest_scenes, line_plugin, screenshot_key_plugin, screenshot_plugin, setup_scene,
    AxesSettings, ScreenshotKey, ScreenshotMode,
};
use crate::ui::hud_plugin;

/// Builder for constructing a plan explorer app with customizable plugins.
pub struct PlanExplorerBuilder {
    sources: Vec<SceneSource>,
    settings: VisualSettings,
    renderer: Option<Box<dyn SceneRenderer>>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    screenshot_path: PathBuf,
    auto_screenshot: Option<u32>,
    log_filter: Option<String>,
    enable_orbit_camera: bool,
    enable_hud: bool,
    enable_axes: bool,
}

impl Default for PlanExplorerBuilder {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            settings: VisualSettings::default(),
            renderer: None,
            window_title: "planvis".to_string(),
            window_resolution: (800.0, 800.0),
            clear_color: Color::srgb(0.96, 0.96, 0.96),
            screenshot_path: PathBuf::from("graph.png"),
            auto_screenshot: None,
            log_filter: None,
            enable_orbit_camera: true,
            enable_hud: true,
            enable_axes: true,
        }
    }
}

impl PlanExplorerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one source; each source becomes one scene.
    pub fn source(mut self, source: SceneSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = SceneSource>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn settings(mut self, settings: VisualSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Provide a custom scene renderer implementation.
    pub fn renderer(mut self, renderer: impl SceneRenderer) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Where `Space` (and auto mode) writes the screenshot.
    pub fn screenshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = path.into();
        self
    }

    /// Capture a screenshot after `frames` frames, then exit.
    pub fn auto_screenshot(mut self, frames: u32) -> Self {
        self.auto_screenshot = Some(frames);
        self
    }

    /// Filter for bevy's logger, in `EnvFilter` syntax. `RUST_LOG` still wins.
    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    pub fn disable_orbit_camera(mut self) -> Self {
        self.enable_orbit_camera = false;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    pub fn disable_axes(mut self) -> Self {
        self.enable_axes = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let channel = init_scene_channel(self.sources, self.settings);
        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(PrimitiveRenderer::default()));

        let mut plugins = DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        });
        if let Some(filter) = self.log_filter {
            plugins = plugins.set(LogPlugin {
                filter,
                ..default()
            });
        }

        let mut app = App::new();
        app.add_plugins(plugins)
            .insert_resource(ClearColor(self.clear_color))
            .insert_resource(channel)
            .add_plugins(line_plugin)
            .insert_resource(AxesSettings {
                enabled: self.enable_axes,
            })
            .insert_resource(ScreenshotKey {
                path: self.screenshot_path.clone(),
            })
            .add_plugins(screenshot_key_plugin)
            .add_systems(Startup, setup_scene)
            .add_systems(Update, ingest_scenes);

        renderer.setup(&mut app);
        app.insert_resource(RendererResource(renderer));

        if self.enable_orbit_camera {
            app.add_plugins(orbit_camera_plugin);
        }
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }
        if let Some(frames) = self.auto_screenshot {
            app.insert_resource(ScreenshotMode::new(self.screenshot_path, frames))
                .add_plugins(screenshot_plugin);
        }

        app
    }
}
