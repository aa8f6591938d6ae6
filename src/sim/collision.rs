//! Hit-testing between the runner and scrolling content
//!
//! Both tests are lane + depth windows. Hazards then apply per-kind vertical
//! rules: barriers are jumped, overheads are rolled under, wide hazards need
//! far more clearance than a barrier and are normally dodged by lane.

use super::runner::Hitbox;
use super::state::{Collectible, Obstacle, ObstacleKind};
use crate::tuning::CollisionRules;

/// True when the hazard is close enough in depth and lane to matter
#[inline]
pub fn obstacle_in_range(obstacle: &Obstacle, hitbox: &Hitbox, rules: &CollisionRules) -> bool {
    obstacle.distance.abs() < rules.obstacle_depth
        && lane_gap(obstacle.lane, hitbox.lane) < rules.lane_tolerance
}

/// Whether the runner's posture and height fail to clear this hazard kind
pub fn posture_collides(kind: ObstacleKind, hitbox: &Hitbox, rules: &CollisionRules) -> bool {
    match kind {
        ObstacleKind::Barrier => hitbox.bottom < rules.barrier_clearance,
        ObstacleKind::Overhead => !(hitbox.rolling && hitbox.bottom < rules.slide_clearance),
        ObstacleKind::Wide => hitbox.bottom < rules.wide_clearance,
    }
}

/// Full hazard test; invincibility is the caller's concern
pub fn obstacle_hits(obstacle: &Obstacle, hitbox: &Hitbox, rules: &CollisionRules) -> bool {
    obstacle_in_range(obstacle, hitbox, rules) && posture_collides(obstacle.kind, hitbox, rules)
}

/// Pickup test; the magnet widens the lane reach
pub fn collectible_reached(
    item: &Collectible,
    hitbox: &Hitbox,
    magnet: bool,
    rules: &CollisionRules,
) -> bool {
    if item.consumed {
        return false;
    }
    let reach = if magnet {
        rules.magnet_lane_tolerance
    } else {
        rules.collect_lane_tolerance
    };
    item.distance.abs() < rules.collect_depth && lane_gap(item.lane, hitbox.lane) < reach
}

#[inline]
fn lane_gap(a: usize, b: usize) -> f32 {
    a.abs_diff(b) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::CollectibleKind;

    fn hitbox(lane: usize, bottom: f32, rolling: bool) -> Hitbox {
        Hitbox {
            lane,
            bottom,
            width: 30.0,
            height: if rolling { 20.0 } else { 60.0 },
            height_offset: if rolling { 40.0 } else { 0.0 },
            rolling,
        }
    }

    fn obstacle(kind: ObstacleKind, lane: usize, distance: f32) -> Obstacle {
        Obstacle {
            id: 1,
            lane,
            distance,
            kind,
        }
    }

    fn coin(lane: usize, distance: f32) -> Collectible {
        Collectible {
            id: 2,
            lane,
            distance,
            kind: CollectibleKind::Coin,
            consumed: false,
        }
    }

    #[test]
    fn test_barrier_needs_jump_clearance() {
        let rules = CollisionRules::default();
        let barrier = obstacle(ObstacleKind::Barrier, 1, 10.0);
        assert!(obstacle_hits(&barrier, &hitbox(1, 0.0, false), &rules));
        assert!(obstacle_hits(&barrier, &hitbox(1, 39.0, false), &rules));
        assert!(!obstacle_hits(&barrier, &hitbox(1, 41.0, false), &rules));
        // Rolling does not help against a barrier
        assert!(obstacle_hits(&barrier, &hitbox(1, 0.0, true), &rules));
    }

    #[test]
    fn test_overhead_needs_roll() {
        let rules = CollisionRules::default();
        let overhead = obstacle(ObstacleKind::Overhead, 0, -5.0);
        assert!(obstacle_hits(&overhead, &hitbox(0, 0.0, false), &rules));
        assert!(!obstacle_hits(&overhead, &hitbox(0, 0.0, true), &rules));
        // Jumping into an overhead still collides
        assert!(obstacle_hits(&overhead, &hitbox(0, 120.0, false), &rules));
    }

    #[test]
    fn test_wide_needs_high_clearance() {
        let rules = CollisionRules::default();
        let wide = obstacle(ObstacleKind::Wide, 2, 0.0);
        assert!(obstacle_hits(&wide, &hitbox(2, 0.0, true), &rules));
        assert!(obstacle_hits(&wide, &hitbox(2, 50.0, false), &rules));
        assert!(!obstacle_hits(&wide, &hitbox(2, 61.0, false), &rules));
        // Changing lane is the usual dodge
        assert!(!obstacle_hits(&wide, &hitbox(1, 0.0, false), &rules));
    }

    #[test]
    fn test_depth_window() {
        let rules = CollisionRules::default();
        let h = hitbox(1, 0.0, false);
        assert!(!obstacle_hits(&obstacle(ObstacleKind::Barrier, 1, 30.0), &h, &rules));
        assert!(obstacle_hits(&obstacle(ObstacleKind::Barrier, 1, 29.9), &h, &rules));
        assert!(!obstacle_hits(&obstacle(ObstacleKind::Barrier, 1, -30.0), &h, &rules));
    }

    #[test]
    fn test_magnet_widens_capture() {
        let rules = CollisionRules::default();
        let item = coin(2, 20.0);
        let h = hitbox(1, 0.0, false);
        assert!(!collectible_reached(&item, &h, false, &rules));
        assert!(collectible_reached(&item, &h, true, &rules));
        // Two lanes away is beyond even the magnet
        assert!(!collectible_reached(&coin(2, 20.0), &hitbox(0, 0.0, false), true, &rules));
    }

    #[test]
    fn test_collect_window_is_wider_than_hazard_window() {
        let rules = CollisionRules::default();
        let h = hitbox(1, 0.0, false);
        assert!(collectible_reached(&coin(1, 35.0), &h, false, &rules));
        assert!(!obstacle_in_range(
            &obstacle(ObstacleKind::Barrier, 1, 35.0),
            &h,
            &rules
        ));
    }

    #[test]
    fn test_consumed_item_is_ignored() {
        let rules = CollisionRules::default();
        let mut item = coin(1, 0.0);
        item.consumed = true;
        assert!(!collectible_reached(&item, &hitbox(1, 0.0, false), true, &rules));
    }
}
