//! Layout mode orchestration: the side effects of switching between the
//! force layout and the geographic map.
//!
//! Mode changes arrive as Bevy state transitions, so re-selecting the
//! already-active mode is a no-op and every consumer matches the mode
//! exhaustively. Switching is atomic from the renderer's perspective: the
//! only user-visible intermediate state is the animation itself.

use bevy::prelude::*;

use crate::core::components::{Airport, GeoCoord, Pinned};
use crate::core::resources::Canvas;
use crate::geo::projection::Projection;
use crate::render::transition::{MapFade, PositionTween};
use crate::sim::forces::ForceSimulation;

/// Node travel time when snapping to projected positions.
pub const MODE_SWITCH_SECS: f32 = 1.0;
/// Map fade-in time, both layers.
pub const FADE_IN_SECS: f32 = 1.0;
/// The body fades out slower than the outline when returning to Force.
pub const BODY_FADE_OUT_SECS: f32 = 2.0;
pub const OUTLINE_FADE_OUT_SECS: f32 = 1.0;

/// The fitted projection, available once the world topology has loaded.
#[derive(Resource, Default)]
pub struct WorldProjection(pub Option<Projection>);

/// Entering Map mode: freeze the simulation, send every node toward its
/// projected geographic position, and fade the map in. Any in-flight drag
/// pin is released so no node is left anchored under the map.
pub fn enter_map_mode(
    mut commands: Commands,
    mut sim: ResMut<ForceSimulation>,
    mut fade: ResMut<MapFade>,
    projection: Res<WorldProjection>,
    canvas: Res<Canvas>,
    nodes: Query<(Entity, &Transform, &GeoCoord), With<Airport>>,
) {
    sim.stop();
    fade.body.fade_to(1.0, FADE_IN_SECS);
    fade.outline.fade_to(1.0, FADE_IN_SECS);

    let Some(projection) = projection.0 else {
        // Data still loading; the loader places nodes directly when it
        // finishes while Map is active.
        return;
    };
    let mut count = 0;
    for (entity, transform, coord) in &nodes {
        let (x, y) = projection.project(coord.longitude, coord.latitude);
        let target = canvas.canvas_to_world(Vec2::new(x as f32, y as f32));
        commands
            .entity(entity)
            .remove::<Pinned>()
            .insert(PositionTween::new(
                transform.translation.truncate(),
                target,
                MODE_SWITCH_SECS,
            ));
        count += 1;
    }
    info!("[MODE] map: {count} airports en route");
}

/// Entering Force mode: cancel any in-flight position animations, reheat
/// the simulation, and fade the map out.
pub fn enter_force_mode(
    mut commands: Commands,
    mut sim: ResMut<ForceSimulation>,
    mut fade: ResMut<MapFade>,
    tweens: Query<Entity, With<PositionTween>>,
) {
    for entity in &tweens {
        commands.entity(entity).remove::<PositionTween>();
    }
    sim.reheat();
    fade.body.fade_to(0.0, BODY_FADE_OUT_SECS);
    fade.outline.fade_to(0.0, OUTLINE_FADE_OUT_SECS);
    info!("[MODE] force: simulation reheated");
}
