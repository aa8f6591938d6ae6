//! Per-frame simulation step
//!
//! Core game loop that advances a run deterministically: difficulty and speed,
//! runner physics, world movement and spawning, collisions, then scoring.

use super::autopilot::autopilot_input;
use super::random::RandomSource;
use super::state::{CollectibleKind, GameEvent, GamePhase, GameState};
use super::world::CollisionReport;
use crate::consts::{MAX_DT_SCALE, NOMINAL_FRAME_SECS};
use crate::normalize_dt;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub roll: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot replaces the commands above
    pub autopilot: bool,
}

/// Advance the run by one frame of `dt` seconds
pub fn tick<R: RandomSource>(state: &mut GameState<R>, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    if dt > NOMINAL_FRAME_SECS * MAX_DT_SCALE {
        log::warn!(
            "Frame took {:.1}ms, capping step to {:.1}ms",
            dt * 1000.0,
            NOMINAL_FRAME_SECS * MAX_DT_SCALE * 1000.0
        );
    }
    let scale = normalize_dt(dt);

    let commands = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };
    apply_commands(state, &commands);

    state.time_ticks += 1;

    // Difficulty and speed follow distance covered so far
    let run = &state.config.run;
    state.difficulty = run.difficulty_at(state.distance);
    state.speed = run.speed_at(state.difficulty);
    let travelled = state.speed * scale;
    state.distance += travelled;
    state.score += travelled as f64
        * run.score_per_distance as f64
        * state.runner.score_factor() as f64;

    state.runner.update(scale);
    state.world.advance(travelled, state.difficulty, &mut state.generator, &mut state.rng);

    let report = state.world.resolve_collisions(&state.runner, &state.config.collision);
    apply_pickups(state, &report, scale);
    apply_obstacle(state, &report);

    let score = state.display_score();
    if score != state.reported_score {
        state.reported_score = score;
        state.events.push(GameEvent::ScoreChanged { score });
    }

    if state.phase == GamePhase::GameOver {
        let stats = state.final_stats();
        log::info!(
            "Game over: score {} distance {:.0} coins {} max combo {}",
            stats.score,
            stats.distance,
            stats.coins,
            stats.max_combo
        );
        state.events.push(GameEvent::GameOver(stats));
    }
}

fn apply_commands<R: RandomSource>(state: &mut GameState<R>, commands: &TickInput) {
    let runner = &mut state.runner;
    if commands.move_left {
        runner.move_left();
    }
    if commands.move_right {
        runner.move_right();
    }
    if commands.jump {
        runner.jump();
    }
    if commands.roll {
        runner.roll();
    }
}

fn apply_pickups<R: RandomSource>(
    state: &mut GameState<R>,
    report: &CollisionReport,
    scale: f32,
) {
    let factor = state.runner.score_factor() as f64;

    for _ in &report.coins {
        state.coins += 1;
        state.combo += 1.0;
        let combo = state.display_combo();
        state.max_combo = state.max_combo.max(combo);
        state.score += state.config.run.coin_value as f64 * factor;
        state.events.push(GameEvent::CoinCollected {
            coins: state.coins,
            combo,
        });
    }

    if report.coins.is_empty() {
        state.combo = (state.combo - state.config.run.combo_decay * scale).max(0.0);
    }
    let combo = state.display_combo();
    if combo != state.reported_combo {
        state.reported_combo = combo;
        state.events.push(GameEvent::ComboChanged { combo });
    }

    let tuning = &state.config.runner;
    for item in &report.power_ups {
        match item.kind {
            CollectibleKind::Magnet => state.runner.activate_magnet(tuning.magnet_ticks),
            CollectibleKind::Multiplier => state
                .runner
                .activate_multiplier(tuning.multiplier_factor, tuning.multiplier_ticks),
            CollectibleKind::Coin => continue,
        }
        log::debug!("Power-up collected: {:?}", item.kind);
        state.events.push(GameEvent::PowerUpCollected { kind: item.kind });
    }
}

fn apply_obstacle<R: RandomSource>(state: &mut GameState<R>, report: &CollisionReport) {
    // Forget shields for obstacles that have been evicted
    let live = &state.world.obstacles;
    state.shielded_obstacles.retain(|id| live.iter().any(|o| o.id == *id));

    let Some(obstacle) = &report.obstacle else {
        return;
    };

    if state.runner.invincibility.active {
        if !state.shielded_obstacles.contains(&obstacle.id) {
            state.shielded_obstacles.push(obstacle.id);
            state.events.push(GameEvent::ObstacleShielded {
                obstacle_id: obstacle.id,
            });
        }
        return;
    }

    log::debug!("Hit {:?} in lane {}", obstacle.kind, obstacle.lane);
    state.phase = GamePhase::GameOver;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_FRAME_SECS as DT;
    use crate::sim::random::scripted::Scripted;
    use crate::sim::state::{FinalStats, ObstacleKind};
    use crate::tuning::SimConfig;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(SimConfig::arcade(), seed).unwrap();
        state.start();
        state
    }

    fn game_overs(events: &[GameEvent]) -> Vec<FinalStats> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver(stats) => Some(*stats),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ready_state_does_not_tick() {
        let mut state = GameState::new(SimConfig::arcade(), 1).unwrap();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.distance, 0.0);

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.take_events()[0], GameEvent::RunStarted { seed: 1 });
    }

    #[test]
    fn test_tick_pause() {
        let mut state = running(12345);
        tick(&mut state, &TickInput::default(), DT);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let distance = state.distance;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.distance, distance);

        // Unpause
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.distance > distance);
    }

    #[test]
    fn test_large_dt_is_capped() {
        let mut state = running(1);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.distance, 2.0 * state.config.run.base_speed);
    }

    #[test]
    fn test_speed_and_difficulty_ramp() {
        let mut state = running(1);
        state.distance = state.config.run.ramp_distance / 2.0;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.difficulty, 0.5);
        assert_eq!(state.speed, 14.0);
        assert_eq!(state.snapshot().run.speed_percent, 50.0);

        state.distance = state.config.run.ramp_distance * 4.0;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.difficulty, 1.0);
        assert_eq!(state.speed, state.config.run.max_speed);
    }

    #[test]
    fn test_commands_reach_runner() {
        let mut state = running(1);
        let input = TickInput {
            move_left: true,
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.runner.target_lane, 0);
        assert!(state.runner.is_jumping());
        assert!(state.runner.height > 0.0);
    }

    #[test]
    fn test_coin_pickup_scores_and_builds_combo() {
        let mut state = running(1);
        state.world.spawn_collectible(1, 10.0, CollectibleKind::Coin);
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.coins, 1);
        assert_eq!(state.display_combo(), 1);
        assert_eq!(state.max_combo, 1);
        assert!((state.score - (0.8 + 10.0)).abs() < 1e-4);
        assert!(state.world.collectibles.is_empty());

        let events = state.take_events();
        assert!(events.contains(&GameEvent::CoinCollected { coins: 1, combo: 1 }));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 10 }));
    }

    #[test]
    fn test_combo_decays_without_coins() {
        let mut state = running(1);
        state.world.spawn_collectible(1, 5.0, CollectibleKind::Coin);
        tick(&mut state, &TickInput::default(), DT);
        state.take_events();

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!((state.combo - 0.8).abs() < 1e-4);
        assert_eq!(state.display_combo(), 0);
        assert_eq!(state.max_combo, 1);

        let drops = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ComboChanged { .. }))
            .count();
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_power_ups_activate_effects() {
        let mut state = running(1);
        state.world.spawn_collectible(1, 5.0, CollectibleKind::Magnet);
        state.world.spawn_collectible(1, 8.0, CollectibleKind::Multiplier);
        tick(&mut state, &TickInput::default(), DT);

        assert!(state.runner.magnet.active);
        assert_eq!(state.runner.score_factor(), 2.0);
        assert_eq!(state.coins, 0);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: CollectibleKind::Magnet
        }));
        assert!(events.contains(&GameEvent::PowerUpCollected {
            kind: CollectibleKind::Multiplier
        }));
    }

    #[test]
    fn test_multiplier_scales_distance_score() {
        let mut state = running(1);
        state.runner.activate_multiplier(2.0, 100);
        tick(&mut state, &TickInput::default(), DT);
        assert!((state.score - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_invincibility_shields_obstacle() {
        let mut state = running(1);
        state.runner.activate_invincibility(100);
        let id = state.world.spawn_obstacle(1, 20.0, ObstacleKind::Barrier);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::Running);
        let shielded: Vec<_> = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstacleShielded { .. }))
            .collect();
        assert_eq!(shielded, vec![GameEvent::ObstacleShielded { obstacle_id: id }]);
    }

    #[test]
    fn test_each_obstacle_shielded_once() {
        let mut state = running(1);
        state.runner.activate_invincibility(100);
        let first = state.world.spawn_obstacle(1, 8.0, ObstacleKind::Barrier);
        let second = state.world.spawn_obstacle(1, 28.0, ObstacleKind::Barrier);

        // first is closest, then second, then first again
        tick(&mut state, &TickInput::default(), DT);
        state.world.obstacles[1].distance = 1.0;
        tick(&mut state, &TickInput::default(), DT);
        state.world.obstacles[0].distance = 0.0;
        state.world.obstacles[1].distance = 20.0;
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::Running);
        let shielded: Vec<_> = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstacleShielded { .. }))
            .collect();
        assert_eq!(
            shielded,
            vec![
                GameEvent::ObstacleShielded { obstacle_id: first },
                GameEvent::ObstacleShielded { obstacle_id: second },
            ]
        );
    }

    #[test]
    fn test_shields_forgotten_after_eviction() {
        let mut state = running(1);
        state.runner.activate_invincibility(100);
        let id = state.world.spawn_obstacle(1, 4.0, ObstacleKind::Wide);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.shielded_obstacles, vec![id]);

        state.world.obstacles[0].distance = -149.0;
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.world.obstacles.is_empty());
        assert!(state.shielded_obstacles.is_empty());
    }

    #[test]
    fn test_fastest_allowed_speed_cannot_skip_barrier() {
        let mut config = SimConfig::arcade();
        config.run.base_speed = 29.0;
        config.run.max_speed = 29.0;
        let mut state = GameState::new(config, 1).unwrap();
        state.start();
        state.world.spawn_obstacle(1, 35.0, ObstacleKind::Barrier);

        // Stalled frames: every tick is capped at twice the nominal step
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 2.0 * DT);
        }
        assert!(state.is_game_over());
    }

    #[test]
    fn test_first_burst_and_game_over() {
        // Barrier in lane 1, then a straight three-coin trail in lane 1, no power-up
        let rng = Scripted::new(&[0.5, 0.5, 0.0, 0.5, 0.1, 0.95]);
        let mut state = GameState::with_rng(SimConfig::arcade(), 0, rng).unwrap();
        state.start();

        let mut ticks = 0;
        while state.world.obstacles.is_empty() {
            tick(&mut state, &TickInput::default(), DT);
            ticks += 1;
            assert!(ticks < 100, "first spawn interval never elapsed");
        }
        assert!(state.distance >= 200.0);
        assert_eq!(state.generator.distance_since_spawn(), 0.0);

        let obstacle = &state.world.obstacles[0];
        assert_eq!(
            (obstacle.id, obstacle.lane, obstacle.distance, obstacle.kind),
            (1, 1, 950.0, ObstacleKind::Barrier)
        );
        let coins: Vec<(usize, f32)> = state
            .world
            .collectibles
            .iter()
            .map(|c| (c.lane, c.distance))
            .collect();
        assert_eq!(coins, vec![(1, 950.0), (1, 1000.0), (1, 1050.0)]);

        // Standing still in lane 1: the first coin is picked up, then the barrier hits
        while !state.is_game_over() {
            tick(&mut state, &TickInput::default(), DT);
            ticks += 1;
            assert!(ticks < 1_000, "runner never hit the barrier");
        }

        let events = state.take_events();
        let finals = game_overs(&events);
        assert_eq!(finals.len(), 1);
        let stats = finals[0];
        assert_eq!(stats, state.final_stats());
        assert_eq!(stats.coins, 1);
        assert_eq!(stats.max_combo, 1);
        assert_eq!(stats.distance, state.distance);
        let expected = state.distance as f64 * 0.1 + 10.0;
        assert!((state.score - expected).abs() < 0.05);
        assert_eq!(stats.score, state.display_score());

        // Terminal: further ticks change nothing and emit nothing
        let frozen = state.time_ticks;
        tick(&mut state, &TickInput::default(), DT);
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.time_ticks, frozen);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_restart_rearms_after_game_over() {
        let mut state = running(3);
        state.world.spawn_obstacle(1, 5.0, ObstacleKind::Wide);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.is_game_over());

        state.start();
        assert!(state.is_game_over());

        state.restart(4);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.seed, 4);
        assert_eq!(state.distance, 0.0);
        assert!(state.world.obstacles.is_empty());
        assert_eq!(state.take_events(), vec![GameEvent::RunStarted { seed: 4 }]);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = SimConfig::arcade();
        config.spawning.initial_interval = 0.0;
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running(99999);
        let mut state2 = running(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..2_000 {
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(
            serde_json::to_string(&state1.snapshot()).unwrap(),
            serde_json::to_string(&state2.snapshot()).unwrap()
        );
        assert_eq!(state1.take_events(), state2.take_events());
    }

    #[test]
    fn test_classic_preset_runs_patterns() {
        let mut state = GameState::new(SimConfig::classic(), 8).unwrap();
        state.start();
        for _ in 0..2_000 {
            tick(&mut state, &TickInput::default(), DT);
            if state.is_game_over() {
                break;
            }
        }
        assert!(state.time_ticks > 0);
        assert!(state.world.collectibles.is_empty());
        assert_eq!(state.coins, 0);
    }
}
