//! Visualization mode state machine.

use bevy::prelude::*;

/// Which coordinate source drives node positions: the force simulation or
/// the geographic projection. Exactly one mode is active at any instant;
/// every consumer matches on it exhaustively.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisMode {
    #[default]
    Force,
    Map,
}
