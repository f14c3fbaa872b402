//! Utility functions.

use bevy::prelude::*;

use crate::core::components::{Airport, GeoCoord, NodeRadius, Velocity};

/// Spawn an airport circle at `position` with the given radius and fill.
/// The radius also serves as the drag hit-test radius via [`NodeRadius`].
#[allow(clippy::too_many_arguments)]
pub fn spawn_airport(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    name: &str,
    passengers: f32,
    coord: GeoCoord,
    position: Vec2,
    radius: f32,
    color: Color,
) -> Entity {
    commands
        .spawn((
            // Floor the drawn size so zero-volume airports stay visible
            Mesh2d(meshes.add(Circle::new(radius.max(0.5)))),
            MeshMaterial2d(materials.add(ColorMaterial::from(color))),
            Transform::from_xyz(position.x, position.y, 1.0),
            Airport {
                name: name.to_string(),
                passengers,
            },
            coord,
            NodeRadius(radius),
            Velocity::default(),
        ))
        .id()
}
