//! Idle/demo mode: the simulation plays itself
//!
//! Looks a few ticks ahead in the runner's lane and picks the dodge each hazard
//! kind calls for. When nothing threatens, it drifts toward the nearest coin.

use super::random::RandomSource;
use super::state::{GameState, Obstacle, ObstacleKind};
use super::tick::TickInput;

/// Ticks of warning the autopilot wants before reacting to a hazard
const LOOKAHEAD_TICKS: f32 = 12.0;
/// A jump needs this many ticks to rise above barrier clearance
const JUMP_LEAD_TICKS: f32 = 4.0;
const ROLL_LEAD_TICKS: f32 = 2.0;

/// Commands the autopilot would issue this tick
pub fn autopilot_input<R: RandomSource>(state: &GameState<R>) -> TickInput {
    let mut input = TickInput::default();
    let runner = &state.runner;
    let depth = state.config.collision.obstacle_depth;
    let speed = state.speed.max(f32::EPSILON);
    let horizon = depth + speed * LOOKAHEAD_TICKS;
    let lane = runner.target_lane;

    let threat = nearest_ahead(&state.world.obstacles, lane, depth, horizon);

    if let Some(obstacle) = threat {
        let lead = obstacle.distance - depth;
        match obstacle.kind {
            ObstacleKind::Barrier => input.jump = lead <= speed * JUMP_LEAD_TICKS,
            ObstacleKind::Overhead => input.roll = lead <= speed * ROLL_LEAD_TICKS,
            ObstacleKind::Wide => {
                match safe_neighbour(state, lane, depth, horizon) {
                    Some(target) if target < lane => input.move_left = true,
                    Some(_) => input.move_right = true,
                    None => input.jump = lead <= speed * JUMP_LEAD_TICKS,
                }
            }
        }
        return input;
    }

    // Nothing dangerous ahead: chase the closest coin if its lane is clear
    let coin_lane = state
        .world
        .collectibles
        .iter()
        .filter(|c| c.distance > 0.0 && c.distance < horizon * 2.0)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .map(|c| c.lane);
    if let Some(target) = coin_lane {
        let step = if target < lane {
            lane - 1
        } else if target > lane {
            lane + 1
        } else {
            lane
        };
        if step != lane && nearest_ahead(&state.world.obstacles, step, depth, horizon).is_none() {
            input.move_left = step < lane;
            input.move_right = step > lane;
        }
    }
    input
}

fn nearest_ahead(
    obstacles: &[Obstacle],
    lane: usize,
    depth: f32,
    horizon: f32,
) -> Option<&Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.lane == lane && o.distance > -depth && o.distance < horizon)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

fn safe_neighbour<R: RandomSource>(
    state: &GameState<R>,
    lane: usize,
    depth: f32,
    horizon: f32,
) -> Option<usize> {
    let lanes = state.runner.lanes();
    [lane.checked_sub(1), (lane + 1 < lanes).then_some(lane + 1)]
        .into_iter()
        .flatten()
        .find(|&candidate| {
            nearest_ahead(&state.world.obstacles, candidate, depth, horizon).is_none()
        })
}
