//! Environment parsing and defaults. Command-line flags override these.

use std::path::PathBuf;

use url::Url;

use crate::geometry::VisualSettings;

const DUMP_DIR_ENV: &str = "PLANVIS_DUMP_DIR";
const REQUESTS_DIR_ENV: &str = "PLANVIS_REQUESTS_DIR";
const HOST_ENV: &str = "PLANVIS_HOST";

const DEFAULT_DUMP_DIR: &str = "build/Release";
const DEFAULT_REQUESTS_DIR: &str = "requests";
const DEFAULT_HOST: &str = "http://127.0.0.1:8000";

/// Loads `.env` from the working directory or its parents, if present.
pub fn load_env() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("ignoring malformed .env: {err}"),
    }
}

/// Directory the planner writes its `est-*.json` and `world_tree.json` dumps to.
pub fn dump_dir() -> PathBuf {
    std::env::var(DUMP_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DUMP_DIR))
}

/// Directory holding recorded request fixtures.
pub fn requests_dir() -> PathBuf {
    std::env::var(REQUESTS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REQUESTS_DIR))
}

fn default_host() -> Url {
    Url::parse(DEFAULT_HOST).expect("default host is a valid url")
}

/// Planner service address. Invalid values fall back to the local default.
pub fn host() -> Url {
    let Ok(raw) = std::env::var(HOST_ENV) else {
        return default_host();
    };
    match raw.parse::<Url>() {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!("invalid URL in {HOST_ENV}: {raw:?} ({err}), using {DEFAULT_HOST}");
            default_host()
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!("ignoring {key}={raw:?}, expected a boolean");
                default
            }
        },
        Err(_) => default,
    }
}

fn env_count(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring {key}={raw:?}, expected a non-negative integer");
            default
        }),
        Err(_) => default,
    }
}

/// Display toggles from `PLANVIS_*` variables, starting from [`VisualSettings::default`].
pub fn visual_settings() -> VisualSettings {
    let d = VisualSettings::default();
    VisualSettings {
        visualize_leaves: env_flag("PLANVIS_VISUALIZE_LEAVES", d.visualize_leaves),
        visualize_objects: env_flag("PLANVIS_VISUALIZE_OBJECTS", d.visualize_objects),
        visualize_rotation: env_flag("PLANVIS_VISUALIZE_ROTATION", d.visualize_rotation),
        highlight_kd_nodes: env_count("PLANVIS_HIGHLIGHT_KD_NODES", d.highlight_kd_nodes),
        exclusive_highlight_kd_nodes: env_flag(
            "PLANVIS_EXCLUSIVE_HIGHLIGHT_KD_NODES",
            d.exclusive_highlight_kd_nodes,
        ),
        visualize_kd_nodes: env_flag("PLANVIS_VISUALIZE_KD_NODES", d.visualize_kd_nodes),
        maximum_kd_depth: env_count("PLANVIS_MAXIMUM_KD_DEPTH", d.maximum_kd_depth),
        visualize_world_kd_tree: env_flag(
            "PLANVIS_VISUALIZE_WORLD_KD_TREE",
            d.visualize_world_kd_tree,
        ),
        mirror_x: env_flag("PLANVIS_MIRROR_X", d.mirror_x),
    }
}
