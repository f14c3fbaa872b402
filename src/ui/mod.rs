//! Immediate-mode UI overlays via bevy_egui.

pub mod overlay;
