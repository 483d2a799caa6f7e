//! Movement heuristics for the automated player.
//!
//! Nothing clever: stay alive by keeping distance from anything bigger, and
//! otherwise drift toward the nearest thing we can eat.

use crate::game_state::GameState;
use protocol::Entity;

/// Keep at least this many of our own radii between us and bigger entities.
const FLEE_RADIUS_FACTOR: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// What the agent wants to do this tick
pub enum Action {
    /// Press play, because we have no live entity yet.
    Play,
    /// Keep moving toward these absolute coordinates.
    MoveTo { x: f64, y: f64 },
}

/// Decides one action from the current state.
///
/// # Returns
/// `Action::Play` while unspawned, a flee target when a larger entity is
/// within range, a chase target when something smaller exists, and `None`
/// when there is nothing to do.
pub fn step(state: &GameState) -> Option<Action> {
    let user = match state.user_entity() {
        Some(user) => user,
        None => return Some(Action::Play),
    };

    // Run away from entities that are larger and close by.
    if let Some(threat) = nearest_entity(state, user, |user, other| other.size > user.size) {
        if distance(user, threat) < FLEE_RADIUS_FACTOR * user.size as f64 {
            let x_delta = user.x as f64 - threat.x as f64;
            let y_delta = user.y as f64 - threat.y as f64;
            return Some(Action::MoveTo {
                x: user.x as f64 + x_delta,
                y: user.y as f64 + y_delta,
            });
        }
    }

    nearest_entity(state, user, |user, other| other.size < user.size).map(|prey| Action::MoveTo {
        x: prey.x as f64,
        y: prey.y as f64,
    })
}

/// Finds the closest entity satisfying the predicate, excluding ourselves.
fn nearest_entity<'a, F>(state: &'a GameState, user: &Entity, predicate: F) -> Option<&'a Entity>
where
    F: Fn(&Entity, &Entity) -> bool,
{
    state
        .entities()
        .values()
        .filter(|other| other.id != user.id && predicate(user, other))
        .min_by(|a, b| {
            distance(user, a)
                .partial_cmp(&distance(user, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Edge-to-edge distance. Size is the radius, so both radii come off the
/// center distance.
fn distance(a: &Entity, b: &Entity) -> f64 {
    let x_distance = a.x as f64 - b.x as f64;
    let y_distance = a.y as f64 - b.y as f64;
    let center_distance = (x_distance * x_distance + y_distance * y_distance).sqrt();
    center_distance - a.size as f64 - b.size as f64
}
