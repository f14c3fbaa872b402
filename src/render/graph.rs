//! Per-tick graph sync: route lines follow their endpoints, nodes stay in
//! bounds when clamping is configured.

use bevy::prelude::*;

use crate::core::components::{Airport, Route};
use crate::core::config::AirwaysConfig;
use crate::core::resources::Canvas;

/// Route line color (light gray, width comes from the gizmo config).
const ROUTE_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);

/// Draw every route as a straight line between its endpoints' current
/// positions. Reading the transforms each frame means an edge can never
/// show a stale endpoint.
pub fn draw_routes_system(
    mut gizmos: Gizmos,
    routes: Query<&Route>,
    transforms: Query<&Transform, With<Airport>>,
) {
    for route in &routes {
        let (Ok(source), Ok(target)) = (transforms.get(route.source), transforms.get(route.target))
        else {
            continue;
        };
        gizmos.line_2d(
            source.translation.truncate(),
            target.translation.truncate(),
            ROUTE_COLOR,
        );
    }
}

/// Keep simulated nodes inside the canvas, inset by the configured margin.
/// Mutates the simulated position itself, so the simulation sees the
/// clamped coordinates on its next tick. Registered for Force mode only;
/// projected positions are never clamped.
pub fn clamp_nodes_system(
    config: Res<AirwaysConfig>,
    canvas: Res<Canvas>,
    mut nodes: Query<&mut Transform, With<Airport>>,
) {
    if !config.clamp_to_bounds {
        return;
    }
    let limit = canvas.half() - Vec2::splat(config.clamp_margin);
    for mut transform in &mut nodes {
        transform.translation.x = transform.translation.x.clamp(-limit.x, limit.x);
        transform.translation.y = transform.translation.y.clamp(-limit.y, limit.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::Velocity;

    fn clamp_app(clamp: bool) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(AirwaysConfig {
                clamp_to_bounds: clamp,
                ..Default::default()
            })
            .insert_resource(Canvas { width: 800.0, height: 500.0 })
            .add_systems(Update, clamp_nodes_system);
        app
    }

    fn spawn_at(app: &mut App, pos: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_xyz(pos.x, pos.y, 0.0),
                Airport { name: "test".to_string(), passengers: 1.0 },
                Velocity::default(),
            ))
            .id()
    }

    #[test]
    fn clamping_pulls_escapees_back_inside() {
        let mut app = clamp_app(true);
        let e = spawn_at(&mut app, Vec2::new(1000.0, -900.0));
        app.update();
        let p = app.world().get::<Transform>(e).unwrap().translation;
        assert_eq!(p.x, 390.0);
        assert_eq!(p.y, -240.0);
    }

    #[test]
    fn clamping_disabled_leaves_positions_alone() {
        let mut app = clamp_app(false);
        let e = spawn_at(&mut app, Vec2::new(1000.0, -900.0));
        app.update();
        let p = app.world().get::<Transform>(e).unwrap().translation;
        assert_eq!(p.x, 1000.0);
        assert_eq!(p.y, -900.0);
    }
}
