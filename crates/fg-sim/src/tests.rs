//! Integration tests for fg-sim.

use std::thread;
use std::time::{Duration, Instant};

use fg_agent::{AgentControl, AgentSnapshot};
use fg_behavior::{RandomNoRepeat, ScriptedPolicy};
use fg_core::{AgentId, Direction, Position, SimConfig};
use fg_grid::{GridSnapshot, Obstacle};
use fg_mobility::{MoveError, MoveOutcome};

use crate::{
    assess, Convergence, ExitReason, NoopObserver, RunState, SimBuilder, SimError, SimObserver,
    TaskExit,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(row: i32, col: i32) -> Position {
    Position::new(row, col)
}

fn fast_config(grid_size: i32) -> SimConfig {
    SimConfig {
        grid_size,
        seed:             Some(42),
        pause_min_ms:     1,
        pause_jitter_ms:  2,
        poll_interval_ms: 5,
        join_timeout_ms:  1_000,
        ..SimConfig::default()
    }
}

/// Records every callback for later inspection.
#[derive(Default)]
struct Recorder {
    starts:    usize,
    polls:     usize,
    exits:     Vec<TaskExit>,
    converged: Vec<(Convergence, Vec<AgentSnapshot>)>,
}

impl SimObserver for Recorder {
    fn on_start(&mut self, _snapshot: &GridSnapshot) {
        self.starts += 1;
    }

    fn on_poll(&mut self, _elapsed: Duration, _snapshot: &GridSnapshot) {
        self.polls += 1;
    }

    fn on_agent_exit(&mut self, exit: &TaskExit) {
        self.exits.push(*exit);
    }

    fn on_converged(&mut self, outcome: &Convergence, agents: &[AgentSnapshot]) {
        self.converged.push((*outcome, agents.to_vec()));
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn default_scenario_populates_grid() {
        let sim = SimBuilder::new(fast_config(4), RandomNoRepeat)
            .random_obstacles(Obstacle::Bomb, 1)
            .random_obstacles(Obstacle::Rock, 2)
            .random_agents(3)
            .build()
            .unwrap();

        let snap = sim.handle().snapshot();
        assert_eq!(snap.size, 4);
        assert_eq!(snap.agents.len(), 3);
        assert_eq!(snap.obstacles.len(), 3);
        assert!(snap.food.is_some());
        let tags: Vec<&str> = snap.agents.iter().map(|a| a.tag.as_str()).collect();
        assert_eq!(tags, ["R1", "R2", "R3"]);
        assert!(sim.grid().with(|g| g.check_invariants()).is_ok());
        assert_eq!(sim.seed, 42);
    }

    #[test]
    fn same_seed_same_layout() {
        let build = || {
            SimBuilder::new(fast_config(6), RandomNoRepeat)
                .random_obstacles(Obstacle::Rock, 4)
                .random_agents(3)
                .build()
                .unwrap()
                .handle()
                .snapshot()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn fixed_placements_respected() {
        let sim = SimBuilder::new(fast_config(4), RandomNoRepeat)
            .obstacle(p(1, 1), Obstacle::Bomb)
            .food_at(p(1, 2))
            .agent("A", p(3, 0))
            .agent_with("P", Some(p(0, 0)), AgentControl::Manual)
            .build()
            .unwrap();
        let snap = sim.handle().snapshot();
        assert_eq!(snap.obstacle_at(p(1, 1)), Some(Obstacle::Bomb));
        assert_eq!(snap.food, Some(p(1, 2)));
        assert_eq!(snap.agent_at(p(3, 0)), Some(AgentId(0)));
        assert_eq!(snap.agents[1].control, AgentControl::Manual);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = fast_config(0);
        let err = SimBuilder::new(config.clone(), RandomNoRepeat).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));

        config.grid_size = 4;
        config.poll_interval_ms = 0;
        let err = SimBuilder::new(config, RandomNoRepeat).build().err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn overfull_scenario_rejected() {
        let err = SimBuilder::new(fast_config(2), RandomNoRepeat)
            .random_agents(4)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::GridTooSmall { needed: 5, available: 4 }));
    }

    #[test]
    fn conflicting_fixed_cells_rejected() {
        let err = SimBuilder::new(fast_config(4), RandomNoRepeat)
            .obstacle(p(0, 0), Obstacle::Rock)
            .agent("A", p(0, 0))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Grid(_)));

        let err = SimBuilder::new(fast_config(4), RandomNoRepeat)
            .obstacle(p(2, 2), Obstacle::Bomb)
            .food_at(p(2, 2))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Grid(_)));
    }
}

// ── assess ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assess_tests {
    use super::*;

    fn agent(id: u32, control: AgentControl, alive: bool, found_food: bool) -> AgentSnapshot {
        AgentSnapshot {
            id: AgentId(id),
            tag: format!("R{}", id + 1),
            control,
            position: p(0, id as i32),
            alive,
            found_food,
            valid_moves: 0,
            invalid_moves: 0,
        }
    }

    fn snapshot(agents: Vec<AgentSnapshot>) -> GridSnapshot {
        GridSnapshot { size: 4, obstacles: vec![], food: Some(p(3, 3)), agents }
    }

    #[test]
    fn running_while_anyone_can_move() {
        let snap = snapshot(vec![
            agent(0, AgentControl::Autonomous, true, false),
            agent(1, AgentControl::Autonomous, false, false),
        ]);
        assert_eq!(assess(&snap, &[false, false]), RunState::Running);
    }

    #[test]
    fn food_wins_over_everything() {
        let snap = snapshot(vec![
            agent(0, AgentControl::Autonomous, true, false),
            agent(1, AgentControl::Autonomous, true, true),
        ]);
        assert_eq!(
            assess(&snap, &[true, true]),
            RunState::Converged(Convergence::FoundFood { agent: AgentId(1) })
        );
    }

    #[test]
    fn dead_or_exited_means_stopped() {
        let snap = snapshot(vec![
            agent(0, AgentControl::Autonomous, true, false),
            agent(1, AgentControl::Autonomous, false, false),
        ]);
        assert_eq!(assess(&snap, &[true, false]), RunState::Converged(Convergence::AllStopped));
    }

    #[test]
    fn live_manual_agent_keeps_running() {
        let snap = snapshot(vec![
            agent(0, AgentControl::Autonomous, true, false),
            agent(1, AgentControl::Manual, true, false),
        ]);
        assert_eq!(assess(&snap, &[true, true]), RunState::Running);

        let snap = snapshot(vec![
            agent(0, AgentControl::Autonomous, true, false),
            agent(1, AgentControl::Manual, false, false),
        ]);
        assert_eq!(assess(&snap, &[true, false]), RunState::Converged(Convergence::AllStopped));
    }

    #[test]
    fn no_agents_is_stopped() {
        assert_eq!(assess(&snapshot(vec![]), &[]), RunState::Converged(Convergence::AllStopped));
    }
}

// ── Simulation::run ───────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn three_agents_converge_once() {
        for seed in 0..5 {
            let config = SimConfig { seed: Some(seed), ..fast_config(4) };
            let sim = SimBuilder::new(config, RandomNoRepeat)
                .random_obstacles(Obstacle::Bomb, 1)
                .random_obstacles(Obstacle::Rock, 2)
                .random_agents(3)
                .build()
                .unwrap();
            let grid = sim.grid().clone();
            let mut rec = Recorder::default();

            let started = Instant::now();
            let report = sim.run(&mut rec).unwrap();
            assert!(started.elapsed() < Duration::from_secs(20));

            assert_eq!(rec.starts, 1);
            assert_eq!(rec.converged.len(), 1);
            assert_eq!(rec.converged[0].0, report.outcome);
            assert!(report.unjoined.is_empty());
            assert!(grid.with(|g| g.check_invariants()).is_ok());

            let finders = report.agents.iter().filter(|a| a.found_food).count();
            match report.outcome {
                Convergence::FoundFood { agent } => {
                    assert_eq!(finders, 1);
                    assert!(report.agents[agent.index()].found_food);
                    assert_eq!(report.winner().map(|a| a.id), Some(agent));
                }
                Convergence::AllStopped => {
                    assert_eq!(finders, 0);
                    assert!(report.agents.iter().all(|a| !a.alive
                        || report.exit_reason(a.id).is_some()));
                }
            }
            // Every thread reported back exactly once.
            assert_eq!(report.exits.len(), 3);
            assert_eq!(rec.exits, report.exits);
        }
    }

    #[test]
    fn three_agents_one_food_default_budget() {
        for seed in 10..15 {
            let config = SimConfig { seed: Some(seed), ..fast_config(4) };
            assert_eq!(config.move_budget, SimConfig::default().move_budget);
            let mut rec = Recorder::default();

            let started = Instant::now();
            let report = SimBuilder::new(config, RandomNoRepeat)
                .random_agents(3)
                .build()
                .unwrap()
                .run(&mut rec)
                .unwrap();
            assert!(started.elapsed() < Duration::from_secs(20));

            assert_eq!(rec.converged.len(), 1);
            let finders = report.agents.iter().filter(|a| a.found_food).count();
            assert!(finders <= 1);
            if let Convergence::FoundFood { agent } = report.outcome {
                assert_eq!(finders, 1);
                assert!(report.agents[agent.index()].found_food);
            }
            assert!(report.unjoined.is_empty());
        }
    }

    #[test]
    fn walled_off_food_still_terminates() {
        // Rocks push the agent back from both neighbours of the food cell.
        let config = SimConfig {
            seed:             Some(7),
            pause_min_ms:     0,
            pause_jitter_ms:  0,
            poll_interval_ms: 5,
            ..SimConfig::default()
        };
        let budget = config.move_budget;
        let sim = SimBuilder::new(config, RandomNoRepeat)
            .food_at(p(0, 0))
            .obstacle(p(0, 1), Obstacle::Rock)
            .obstacle(p(1, 0), Obstacle::Rock)
            .agent("R1", p(3, 3))
            .build()
            .unwrap();

        let (tx, rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            let _ = tx.send(sim.run(&mut NoopObserver));
        });
        let report = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("run did not terminate")
            .unwrap();

        assert_eq!(report.outcome, Convergence::AllStopped);
        assert_eq!(report.exits, vec![TaskExit {
            agent:  AgentId(0),
            reason: ExitReason::BudgetExhausted,
            turns:  budget,
        }]);
        assert!(!report.agents[0].found_food);
        assert!(report.agents[0].alive);
    }

    #[test]
    fn scripted_walk_to_food() {
        let policy = ScriptedPolicy::new().with_script(
            AgentId(0),
            [Direction::Right, Direction::Right, Direction::Up, Direction::Up],
        );
        let report = SimBuilder::new(fast_config(4), policy)
            .food_at(p(1, 2))
            .obstacle(p(1, 1), Obstacle::Bomb)
            .agent("R1", p(3, 0))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        assert_eq!(report.outcome, Convergence::FoundFood { agent: AgentId(0) });
        assert_eq!(report.exit_reason(AgentId(0)), Some(ExitReason::FoundFood));
        let r1 = &report.agents[0];
        assert_eq!(r1.position, p(1, 2));
        assert_eq!(r1.valid_moves, 4);
        assert!(r1.alive);
    }

    #[test]
    fn bomb_ends_the_run() {
        let policy = ScriptedPolicy::new().with_script(AgentId(0), [Direction::Right]);
        let report = SimBuilder::new(fast_config(4), policy)
            .obstacle(p(0, 1), Obstacle::Bomb)
            .food_at(p(3, 3))
            .agent("R1", p(0, 0))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        assert_eq!(report.outcome, Convergence::AllStopped);
        assert_eq!(report.exit_reason(AgentId(0)), Some(ExitReason::Died));
        assert!(!report.agents[0].alive);
        assert!(report.winner().is_none());
    }

    #[test]
    fn stuck_agents_stop_the_run() {
        // No scripts: every agent is stuck on its first turn.
        let report = SimBuilder::new(fast_config(4), ScriptedPolicy::new())
            .random_agents(2)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        assert_eq!(report.outcome, Convergence::AllStopped);
        assert_eq!(report.exit_reason(AgentId(0)), Some(ExitReason::Stuck));
        assert_eq!(report.exit_reason(AgentId(1)), Some(ExitReason::Stuck));
        assert!(report.agents.iter().all(|a| a.alive));
    }

    #[test]
    fn move_budget_limits_turns() {
        let config = SimConfig { move_budget: 2, ..fast_config(5) };
        let policy = ScriptedPolicy::new().with_script(
            AgentId(0),
            [Direction::Down, Direction::Up, Direction::Down, Direction::Up],
        );
        let report = SimBuilder::new(config, policy)
            .food_at(p(4, 4))
            .agent("R1", p(0, 0))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        assert_eq!(report.outcome, Convergence::AllStopped);
        assert_eq!(report.exits, vec![TaskExit {
            agent:  AgentId(0),
            reason: ExitReason::BudgetExhausted,
            turns:  2,
        }]);
        assert_eq!(report.agents[0].valid_moves, 2);
        assert_eq!(report.agents[0].position, p(0, 0));
    }

    #[test]
    fn long_pause_does_not_delay_shutdown() {
        let config = SimConfig { pause_min_ms: 5_000, pause_jitter_ms: 0, ..fast_config(5) };
        let policy = ScriptedPolicy::new()
            .with_script(AgentId(0), [Direction::Right])
            .with_script(AgentId(1), [Direction::Down, Direction::Up]);
        let started = Instant::now();
        let report = SimBuilder::new(config, policy)
            .food_at(p(0, 1))
            .agent("R1", p(0, 0))
            .agent("R2", p(4, 0))
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(report.outcome, Convergence::FoundFood { agent: AgentId(0) });
        assert_eq!(report.exit_reason(AgentId(1)), Some(ExitReason::Cancelled));
        assert!(report.unjoined.is_empty());
    }

    #[test]
    fn manual_agent_driven_through_handle() {
        let sim = SimBuilder::new(fast_config(4), ScriptedPolicy::new())
            .agent_with("P", Some(p(0, 0)), AgentControl::Manual)
            .agent("R1", p(3, 3))
            .food_at(p(0, 2))
            .build()
            .unwrap();
        let handle = sim.handle();

        let report = thread::scope(|s| {
            let runner = s.spawn(move || sim.run(&mut NoopObserver));

            // R1 gets stuck at once; P keeps the run alive until it eats.
            thread::sleep(Duration::from_millis(30));
            assert!(!handle.is_stopped());
            assert_eq!(handle.request_move(AgentId(0), Direction::Up), Err(MoveError::OutOfBounds(p(-1, 0))));
            assert_eq!(handle.request_move(AgentId(9), Direction::Up), Err(MoveError::UnknownAgent(AgentId(9))));
            assert_eq!(handle.request_move(AgentId(0), Direction::Right), Ok(MoveOutcome::Moved(p(0, 1))));
            assert_eq!(handle.request_move(AgentId(0), Direction::Right), Ok(MoveOutcome::FoundFood(p(0, 2))));

            runner.join().unwrap().unwrap()
        });

        assert_eq!(report.outcome, Convergence::FoundFood { agent: AgentId(0) });
        assert!(handle.is_stopped());
        assert_eq!(report.agents[0].invalid_moves, 1);
        assert_eq!(report.agents[0].valid_moves, 2);
        assert_eq!(report.exit_reason(AgentId(0)), None);
        assert_eq!(report.exit_reason(AgentId(1)), Some(ExitReason::Stuck));
    }

    #[test]
    fn observer_sees_polls_and_exits() {
        let mut rec = Recorder::default();
        let report = SimBuilder::new(fast_config(4), ScriptedPolicy::new())
            .random_agents(3)
            .build()
            .unwrap()
            .run(&mut rec)
            .unwrap();

        assert!(rec.polls >= 1);
        assert_eq!(rec.exits.len(), 3);
        let (outcome, agents) = &rec.converged[0];
        assert_eq!(*outcome, report.outcome);
        assert_eq!(agents, &report.agents);
    }
}
