use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::geo::projection::ProjectionKind;

/// Application configuration loaded from `~/.airwaysrc`.
///
/// Defaults give an 800x500 Mercator canvas with pink nodes; a 600x400
/// Natural Earth setup with orange nodes and bounds clamping is a few
/// lines of TOML away.
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
pub struct AirwaysConfig {
    /// Logical canvas width in world units.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f32,
    /// Logical canvas height in world units.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f32,
    /// Map projection: "mercator" or "natural-earth".
    #[serde(default)]
    pub projection: ProjectionKind,
    /// Background color of the canvas in hex format (e.g., "#1e1e2e").
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Airport circle fill color in hex format.
    #[serde(default = "default_node_color")]
    pub node_color: String,
    /// Country fill color for the map layer.
    #[serde(default = "default_map_color")]
    pub map_color: String,
    /// Keep simulated nodes inside the canvas, inset by `clamp_margin`.
    #[serde(default)]
    pub clamp_to_bounds: bool,
    #[serde(default = "default_clamp_margin")]
    pub clamp_margin: f32,
}

fn default_canvas_width() -> f32 { 800.0 }
fn default_canvas_height() -> f32 { 500.0 }
fn default_background_color() -> String { "#10141c".to_string() }
fn default_node_color() -> String { "#ffc0cb".to_string() }
fn default_map_color() -> String { "#2e3d4f".to_string() }
fn default_clamp_margin() -> f32 { 10.0 }

impl Default for AirwaysConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            projection: ProjectionKind::default(),
            background_color: default_background_color(),
            node_color: default_node_color(),
            map_color: default_map_color(),
            clamp_to_bounds: false,
            clamp_margin: default_clamp_margin(),
        }
    }
}

impl AirwaysConfig {
    /// Parse the background hex string into a Bevy Color.
    pub fn bg_color(&self) -> Color {
        bevy::color::Srgba::hex(&self.background_color)
            .unwrap_or(bevy::color::Srgba::new(0.06, 0.08, 0.11, 1.0))
            .into()
    }

    /// Parse the node hex string into a Bevy Color.
    pub fn node_color(&self) -> Color {
        bevy::color::Srgba::hex(&self.node_color)
            .unwrap_or(bevy::color::Srgba::new(1.0, 0.75, 0.80, 1.0))
            .into()
    }

    /// Parse the map fill hex string into a Bevy Color.
    pub fn map_color(&self) -> Color {
        bevy::color::Srgba::hex(&self.map_color)
            .unwrap_or(bevy::color::Srgba::new(0.18, 0.24, 0.31, 1.0))
            .into()
    }
}

/// Attempts to load the configuration from `~/.airwaysrc`.
/// Falls back to default if the file is missing or invalid.
pub fn load_config() -> AirwaysConfig {
    if let Ok(home) = env::var("HOME") {
        let path = PathBuf::from(home).join(".airwaysrc");
        if let Ok(contents) = fs::read_to_string(path) {
            match toml::from_str(&contents) {
                Ok(config) => return config,
                Err(err) => {
                    eprintln!("Failed to parse ~/.airwaysrc: {}", err);
                }
            }
        }
    }
    AirwaysConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_mercator_800x500() {
        let config = AirwaysConfig::default();
        assert_eq!(config.canvas_width, 800.0);
        assert_eq!(config.canvas_height, 500.0);
        assert_eq!(config.projection, ProjectionKind::Mercator);
        assert!(!config.clamp_to_bounds);
    }

    #[test]
    fn node_color_parses_hex() {
        let config = AirwaysConfig {
            node_color: "#00ff00".to_string(),
            ..Default::default()
        };
        let nc = config.node_color();
        let srgba = nc.to_srgba();
        assert!(srgba.red.abs() < 0.01);
        assert!((srgba.green - 1.0).abs() < 0.01);
        assert!(srgba.blue.abs() < 0.01);
    }

    #[test]
    fn invalid_hex_falls_back() {
        let config = AirwaysConfig {
            background_color: "not_a_color".to_string(),
            node_color: "also_bad".to_string(),
            map_color: "nope".to_string(),
            ..Default::default()
        };
        // Should not panic, should fall back to defaults
        let _bg = config.bg_color();
        let _nc = config.node_color();
        let _mc = config.map_color();
    }

    #[test]
    fn natural_earth_setup_expressible_in_toml() {
        let toml_str = r##"
canvas_width = 600.0
canvas_height = 400.0
projection = "natural-earth"
node_color = "#ffa500"
clamp_to_bounds = true
"##;
        let parsed: AirwaysConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.canvas_width, 600.0);
        assert_eq!(parsed.projection, ProjectionKind::NaturalEarth);
        assert!(parsed.clamp_to_bounds);
        assert_eq!(parsed.clamp_margin, 10.0);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let parsed: AirwaysConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.canvas_width, 800.0);
        assert_eq!(parsed.node_color, "#ffc0cb");
    }

    #[test]
    fn toml_roundtrip() {
        let config = AirwaysConfig {
            projection: ProjectionKind::NaturalEarth,
            clamp_to_bounds: true,
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AirwaysConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.projection, ProjectionKind::NaturalEarth);
        assert!(parsed.clamp_to_bounds);
    }
}
