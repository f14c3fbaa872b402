//! Node drag: pin an airport under the cursor and let the simulation
//! arrange everything else around the anchor.
//!
//! These systems are registered to run only in Force mode; in Map mode the
//! gesture is rejected entirely and no pin state is touched.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::components::{Airport, MainCamera, NodeRadius, Pinned};
use crate::sim::forces::ForceSimulation;

/// Energy target held while a drag is in progress.
const DRAG_ALPHA_TARGET: f32 = 0.3;
/// Smallest hit radius so low-volume airports remain grabbable.
pub(crate) const MIN_PICK_RADIUS: f32 = 6.0;

pub(crate) fn cursor_world_pos(
    window_q: &Query<&Window, With<PrimaryWindow>>,
    camera_q: &Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) -> Option<Vec2> {
    let window = window_q.single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, cam_transform) = camera_q.single().ok()?;
    camera.viewport_to_world_2d(cam_transform, cursor).ok()
}

/// Pin `entity` at `center`. If the simulation is at rest, lift its energy
/// target and resume so neighbours rearrange around the anchor.
pub fn begin_drag(
    commands: &mut Commands,
    sim: &mut ForceSimulation,
    entity: Entity,
    center: Vec2,
    cursor: Vec2,
) {
    if !sim.active() {
        sim.alpha_target = DRAG_ALPHA_TARGET;
        sim.restart();
    }
    commands.entity(entity).insert(Pinned {
        pos: center,
        offset: cursor - center,
    });
}

/// Clear the pin and relax the energy target so the layout settles again.
/// A single pointer means this gesture is the only thing holding the
/// target up, so relaxing unconditionally matches the gesture contract.
pub fn end_drag(commands: &mut Commands, sim: &mut ForceSimulation, entity: Entity) {
    commands.entity(entity).remove::<Pinned>();
    sim.alpha_target = 0.0;
}

/// Left press on an airport grabs and pins it. Space is reserved for
/// camera panning, so Space+click never grabs.
pub fn drag_start_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut commands: Commands,
    mut sim: ResMut<ForceSimulation>,
    nodes: Query<(Entity, &Transform, &NodeRadius, &Airport)>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if keys.pressed(KeyCode::Space) {
        return;
    }
    let Some(cursor) = cursor_world_pos(&window_q, &camera_q) else {
        return;
    };

    for (entity, transform, radius, airport) in &nodes {
        let center = transform.translation.truncate();
        let pick = radius.0.max(MIN_PICK_RADIUS);
        if cursor.distance_squared(center) <= pick * pick {
            begin_drag(&mut commands, &mut sim, entity, center, cursor);
            info!("[DRAG] grab {:?} ({})", entity, airport.name);
            return;
        }
    }
}

/// While the button is held, the pin follows the cursor. The simulation
/// recomputes every other node relative to the anchor each tick.
pub fn drag_move_system(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut pinned: Query<&mut Pinned>,
) {
    if !mouse_buttons.pressed(MouseButton::Left) {
        return;
    }
    let Some(cursor) = cursor_world_pos(&window_q, &camera_q) else {
        return;
    };
    for mut pin in &mut pinned {
        pin.pos = cursor - pin.offset;
    }
}

/// Release clears the pin so the node resumes free physics-driven motion.
pub fn drag_end_system(
    mut commands: Commands,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut sim: ResMut<ForceSimulation>,
    pinned: Query<Entity, With<Pinned>>,
) {
    if !mouse_buttons.just_released(MouseButton::Left) {
        return;
    }
    for entity in &pinned {
        end_drag(&mut commands, &mut sim, entity);
        info!("[DRAG] release {:?}", entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::CommandQueue;

    #[test]
    fn begin_drag_pins_and_lifts_energy_target() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut sim = ForceSimulation::default();
        sim.running = false;
        sim.alpha_target = 0.0;

        let mut queue = CommandQueue::default();
        {
            let mut commands = Commands::new(&mut queue, &world);
            begin_drag(
                &mut commands,
                &mut sim,
                entity,
                Vec2::new(10.0, 20.0),
                Vec2::new(13.0, 20.0),
            );
        }
        queue.apply(&mut world);

        let pin = world.get::<Pinned>(entity).expect("node pinned");
        assert_eq!(pin.pos, Vec2::new(10.0, 20.0));
        assert_eq!(pin.offset, Vec2::new(3.0, 0.0));
        assert_eq!(sim.alpha_target, DRAG_ALPHA_TARGET);
        assert!(sim.running);
    }

    #[test]
    fn begin_drag_leaves_elevated_target_alone() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut sim = ForceSimulation::default();
        sim.alpha_target = 0.5;

        let mut queue = CommandQueue::default();
        {
            let mut commands = Commands::new(&mut queue, &world);
            begin_drag(&mut commands, &mut sim, entity, Vec2::ZERO, Vec2::ZERO);
        }
        queue.apply(&mut world);

        assert_eq!(sim.alpha_target, 0.5);
    }

    #[test]
    fn end_drag_releases_pin_and_relaxes_target() {
        let mut world = World::new();
        let entity = world
            .spawn(Pinned { pos: Vec2::ZERO, offset: Vec2::ZERO })
            .id();
        let mut sim = ForceSimulation::default();
        sim.alpha_target = DRAG_ALPHA_TARGET;

        let mut queue = CommandQueue::default();
        {
            let mut commands = Commands::new(&mut queue, &world);
            end_drag(&mut commands, &mut sim, entity);
        }
        queue.apply(&mut world);

        assert!(world.get::<Pinned>(entity).is_none());
        assert_eq!(sim.alpha_target, 0.0);
    }
}
