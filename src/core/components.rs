//! ECS components for the airport graph and the map layers.

use bevy::prelude::*;

/// An airport circle in the network.
#[derive(Component)]
pub struct Airport {
    pub name: String,
    /// Annual passenger volume. Drives the circle radius.
    pub passengers: f32,
}

/// Geographic coordinate in degrees. Authoritative position source in Map mode.
#[derive(Component, Clone, Copy)]
pub struct GeoCoord {
    pub longitude: f64,
    pub latitude: f64,
}

/// Circle radius in world units. Doubles as the drag hit-test radius.
#[derive(Component, Clone, Copy)]
pub struct NodeRadius(pub f32);

/// Velocity carried by the force simulation between ticks.
#[derive(Component, Default, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Route between two airports. Both endpoints are resolved at load time,
/// so a spawned Route never dangles.
#[derive(Component)]
pub struct Route {
    pub source: Entity,
    pub target: Entity,
}

/// Attached to an airport while it is being mouse-dragged. The simulation
/// anchors the node at `pos` (fixed x/y) until the pin is cleared.
/// `offset` is (cursor_world – node_center) at the moment the drag began,
/// so the node does not "snap" to the cursor centre.
#[derive(Component, Clone, Copy)]
pub struct Pinned {
    pub pos: Vec2,
    pub offset: Vec2,
}

/// Marker for the filled country-polygon mesh entities.
#[derive(Component)]
pub struct MapBody;

/// Marker for the primary 2D camera.
#[derive(Component)]
pub struct MainCamera;
