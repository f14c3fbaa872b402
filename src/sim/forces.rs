//! Force simulation: charge repulsion, route springs, and centering,
//! integrated with an exponentially decaying energy (alpha) that parks the
//! simulation once it settles.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::components::{Airport, Pinned, Route, Velocity};

/// Many-body charge strength; negative repels.
const CHARGE_STRENGTH: f32 = -5.0;
/// Spring rest length for routes.
const LINK_DISTANCE: f32 = 40.0;
/// Pull of the whole layout toward the canvas middle.
const CENTER_STRENGTH: f32 = 1.5;
/// Fraction of velocity surviving each tick.
const VELOCITY_RETENTION: f32 = 0.6;
/// Squared distance floor so coincident nodes don't produce infinite forces.
const MIN_DIST_SQ: f32 = 1.0;

/// Simulation energy state. Alpha relaxes toward `alpha_target` each tick;
/// when it sinks below `alpha_min` with the target at rest, the simulation
/// parks itself until restarted or reheated.
#[derive(Resource)]
pub struct ForceSimulation {
    pub alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub alpha_target: f32,
    pub running: bool,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            // Reaches alpha_min in ~300 ticks from a cold start
            alpha_decay: 1.0 - 0.001f32.powf(1.0 / 300.0),
            alpha_target: 0.0,
            running: true,
        }
    }
}

impl ForceSimulation {
    /// Freeze further automatic position updates. Clears any interaction
    /// energy target so a later restart can settle.
    pub fn stop(&mut self) {
        self.running = false;
        self.alpha_target = 0.0;
    }

    /// Resume iteration at the current energy.
    pub fn restart(&mut self) {
        self.running = true;
    }

    /// Raise energy to maximum and resume.
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }

    /// True while an interaction holds the energy target above rest.
    pub fn active(&self) -> bool {
        self.alpha_target > 0.0
    }
}

/// Deterministic initial placement: node `i` sits on a phyllotaxis spiral
/// around the origin, so the first ticks start from an evenly spread disc
/// instead of a singularity.
pub fn phyllotaxis(i: usize) -> Vec2 {
    const INITIAL_RADIUS: f32 = 10.0;
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    let r = INITIAL_RADIUS * (0.5 + i as f32).sqrt();
    let a = i as f32 * golden_angle;
    Vec2::new(r * a.cos(), r * a.sin())
}

/// One simulation step. Pinned nodes are anchored at their pin and excluded
/// from integration; everything else accumulates charge, spring, and
/// centering impulses scaled by the current alpha.
pub fn force_simulation_system(
    mut sim: ResMut<ForceSimulation>,
    mut nodes: Query<(Entity, &mut Transform, &mut Velocity, Option<&Pinned>), With<Airport>>,
    routes: Query<&Route>,
) {
    if !sim.running {
        return;
    }
    sim.alpha += (sim.alpha_target - sim.alpha) * sim.alpha_decay;
    if sim.alpha < sim.alpha_min {
        sim.running = false;
        info!("[SIM] settled");
        return;
    }
    let alpha = sim.alpha;

    let snapshot: Vec<(Entity, Vec2)> = nodes
        .iter()
        .map(|(e, t, ..)| (e, t.translation.truncate()))
        .collect();
    if snapshot.is_empty() {
        return;
    }
    let index: HashMap<Entity, usize> = snapshot
        .iter()
        .enumerate()
        .map(|(i, (e, _))| (*e, i))
        .collect();
    let mut impulse = vec![Vec2::ZERO; snapshot.len()];

    // Charge: every pair repels. O(n²) is fine at airport-dataset scale.
    for i in 0..snapshot.len() {
        for j in (i + 1)..snapshot.len() {
            let delta = snapshot[j].1 - snapshot[i].1;
            let d2 = delta.length_squared().max(MIN_DIST_SQ);
            let w = CHARGE_STRENGTH * alpha / d2;
            impulse[i] += delta * w;
            impulse[j] -= delta * w;
        }
    }

    // Route springs. Endpoint shares are split by degree so hub airports
    // aren't yanked around by every spoke.
    let mut degree = vec![0usize; snapshot.len()];
    let mut resolved: Vec<(usize, usize)> = Vec::new();
    for route in &routes {
        let (Some(&s), Some(&t)) = (index.get(&route.source), index.get(&route.target)) else {
            continue;
        };
        degree[s] += 1;
        degree[t] += 1;
        resolved.push((s, t));
    }
    for &(s, t) in &resolved {
        let delta = snapshot[t].1 - snapshot[s].1;
        let d = delta.length().max(1.0);
        let strength = 1.0 / degree[s].min(degree[t]).max(1) as f32;
        let l = (d - LINK_DISTANCE) / d * alpha * strength;
        let bias = degree[s] as f32 / (degree[s] + degree[t]) as f32;
        impulse[t] -= delta * l * bias;
        impulse[s] += delta * l * (1.0 - bias);
    }

    // Centering: shift the whole layout so its mean sits on the origin
    let mean = snapshot.iter().map(|(_, p)| *p).sum::<Vec2>() / snapshot.len() as f32;
    let shift = mean * CENTER_STRENGTH;

    for (entity, mut transform, mut velocity, pinned) in &mut nodes {
        if let Some(pin) = pinned {
            velocity.0 = Vec2::ZERO;
            transform.translation.x = pin.pos.x;
            transform.translation.y = pin.pos.y;
            continue;
        }
        let Some(&i) = index.get(&entity) else {
            continue;
        };
        velocity.0 = (velocity.0 + impulse[i]) * VELOCITY_RETENTION;
        let p = snapshot[i].1 - shift + velocity.0;
        transform.translation.x = p.x;
        transform.translation.y = p.y;
    }
}
