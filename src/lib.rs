//! Airways — interactive airport-traffic network. Nodes are airports sized
//! by passenger volume, edges are routes; a physics-driven force layout and
//! a projected world map share the canvas, toggled by the maptype control.

pub mod core;
pub mod geo;
pub mod input;
pub mod io;
pub mod layout;
pub mod render;
pub mod sim;
pub mod ui;

use bevy::prelude::*;
use bevy_egui::{input::egui_wants_any_pointer_input, EguiPlugin};

use crate::core::components::MainCamera;
use crate::core::resources::{Canvas, StatusMessage};
use crate::core::state::VisMode;

use crate::input::camera::{camera_pan_system, camera_zoom_system};
use crate::input::drag::{drag_end_system, drag_move_system, drag_start_system};
use crate::io::loader::{apply_loaded_data_system, start_load_system, DataPaths, PendingDatasets};
use crate::layout::{enter_force_mode, enter_map_mode, WorldProjection};
use crate::render::graph::{clamp_nodes_system, draw_routes_system};
use crate::render::map::{apply_map_fade_system, draw_map_outline_system, MapOutline};
use crate::render::scale::SizeScale;
use crate::render::transition::{map_fade_system, position_tween_system, MapFade};
use crate::sim::forces::{force_simulation_system, ForceSimulation};
use crate::ui::overlay::{
    node_tooltip_system, status_message_tick_system, ui_bottom_bar_system, ui_top_bar_system,
};

/// Build and run the Airways app.
pub fn run() {
    let config = crate::core::config::load_config();
    let canvas = Canvas {
        width: config.canvas_width,
        height: config.canvas_height,
    };

    // Dataset paths: `airways [airports.json] [world.json]`
    let mut paths = DataPaths::default();
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        paths.airports = path.into();
    }
    if let Some(path) = args.next() {
        paths.world = path.into();
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Airways".to_string(),
                resolution: (canvas.width, canvas.height).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(config.bg_color()))
        .insert_resource(canvas)
        .insert_resource(config)
        .insert_resource(paths)
        .init_state::<VisMode>()
        .init_resource::<ForceSimulation>()
        .init_resource::<MapFade>()
        .init_resource::<MapOutline>()
        .init_resource::<WorldProjection>()
        .init_resource::<SizeScale>()
        .init_resource::<StatusMessage>()
        .init_resource::<PendingDatasets>()
        .add_systems(Startup, (setup_canvas, start_load_system))
        .add_systems(OnEnter(VisMode::Map), enter_map_mode)
        .add_systems(OnEnter(VisMode::Force), enter_force_mode)
        .add_systems(
            Update,
            (
                apply_loaded_data_system,
                camera_zoom_system,
                camera_pan_system,
                drag_start_system
                    .run_if(in_state(VisMode::Force))
                    .run_if(not(egui_wants_any_pointer_input)),
                drag_move_system.run_if(in_state(VisMode::Force)),
                drag_end_system.run_if(in_state(VisMode::Force)),
                force_simulation_system,
                position_tween_system,
                map_fade_system,
                clamp_nodes_system.run_if(in_state(VisMode::Force)),
            ),
        )
        .add_systems(
            Update,
            (
                draw_routes_system,
                draw_map_outline_system,
                apply_map_fade_system,
                status_message_tick_system,
            ),
        )
        .add_systems(
            bevy_egui::EguiPrimaryContextPass,
            (ui_top_bar_system, ui_bottom_bar_system, node_tooltip_system),
        )
        .run();
}

fn setup_canvas(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}
