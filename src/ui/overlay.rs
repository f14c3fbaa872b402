//! egui overlays: the maptype control, status bar, and airport tooltips.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};

use crate::core::components::{Airport, MainCamera, NodeRadius, Route};
use crate::core::resources::StatusMessage;
use crate::core::state::VisMode;
use crate::input::drag::{cursor_world_pos, MIN_PICK_RADIUS};
use crate::sim::forces::ForceSimulation;

/// Top bar: the maptype control. Two mutually exclusive radio buttons;
/// picking the inactive one triggers the layout transition, re-clicking
/// the active one writes no state change.
pub fn ui_top_bar_system(
    mut contexts: EguiContexts,
    state: Res<State<VisMode>>,
    mut next_state: ResMut<NextState<VisMode>>,
    nodes: Query<(), With<Airport>>,
    routes: Query<(), With<Route>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("top_bar")
        .default_height(32.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Airways").strong());
                ui.separator();
                let mut mode = *state.get();
                ui.radio_value(&mut mode, VisMode::Force, "Force");
                ui.radio_value(&mut mode, VisMode::Map, "Map");
                if mode != *state.get() {
                    info!("[UI] maptype -> {:?}", mode);
                    next_state.set(mode);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{} airports, {} routes",
                        nodes.iter().count(),
                        routes.iter().count()
                    ));
                });
            });
        });
}

/// Bottom bar: transient status on the left, simulation energy on the right.
pub fn ui_bottom_bar_system(
    mut contexts: EguiContexts,
    status: Res<StatusMessage>,
    sim: Res<ForceSimulation>,
    state: Res<State<VisMode>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("bottom_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if status.timer > 0.0 {
                ui.colored_label(egui::Color32::LIGHT_YELLOW, &status.text);
            } else {
                let hint = match state.get() {
                    VisMode::Force => "drag airports to pin them",
                    VisMode::Map => "airports shown at their geographic position",
                };
                ui.label(hint);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if sim.running {
                    ui.label(format!("alpha {:.3}", sim.alpha));
                }
            });
        });
    });
}

/// Count down the status message timer.
pub fn status_message_tick_system(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.timer > 0.0 {
        status.timer -= time.delta_secs();
    }
}

/// Hover tooltip with the airport name and passenger volume.
pub fn node_tooltip_system(
    mut contexts: EguiContexts,
    window_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    nodes: Query<(&Airport, &Transform, &NodeRadius)>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    if ctx.is_pointer_over_area() {
        return;
    }
    let Some(cursor) = cursor_world_pos(&window_q, &camera_q) else {
        return;
    };

    for (airport, transform, radius) in &nodes {
        let center = transform.translation.truncate();
        let pick = radius.0.max(MIN_PICK_RADIUS);
        if cursor.distance_squared(center) > pick * pick {
            continue;
        }
        let Ok(window) = window_q.single() else {
            return;
        };
        let Some(screen) = window.cursor_position() else {
            return;
        };
        egui::Area::new(egui::Id::new("airport_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(egui::pos2(screen.x + 12.0, screen.y + 12.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new(&airport.name).strong());
                    ui.label(format!("{} passengers", airport.passengers as i64));
                });
            });
        return;
    }
}
