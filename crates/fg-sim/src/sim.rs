//! The `Simulation` driver: agent threads, detection loop, shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use fg_agent::{AgentControl, AgentRngs, AgentSnapshot};
use fg_behavior::DecisionPolicy;
use fg_core::{AgentId, SimConfig};
use fg_grid::{GridSnapshot, SharedGrid};
use tracing::{error, info, warn};

use crate::task::AgentTask;
use crate::{ExitReason, SimError, SimHandle, SimObserver, SimResult, TaskExit};

// ── Convergence ───────────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convergence {
    /// `agent` reached the food first.
    FoundFood { agent: AgentId },
    /// Every agent is dead or has stopped moving.
    AllStopped,
}

impl std::fmt::Display for Convergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Convergence::FoundFood { agent } => write!(f, "food found by {agent}"),
            Convergence::AllStopped => f.write_str("all agents stopped"),
        }
    }
}

/// Result of one detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Converged(Convergence),
}

/// Decide whether the run is over.
///
/// `exited[i]` is `true` once `AgentId(i)`'s thread has reported an exit.
/// Manual agents have no thread and count as stopped only when dead.
pub fn assess(snapshot: &GridSnapshot, exited: &[bool]) -> RunState {
    if let Some(agent) = snapshot.food_finder() {
        return RunState::Converged(Convergence::FoundFood { agent });
    }
    let stopped = snapshot.agents.iter().all(|a| {
        !a.alive
            || (a.control == AgentControl::Autonomous
                && exited.get(a.id.index()).copied().unwrap_or(false))
    });
    if stopped {
        RunState::Converged(Convergence::AllStopped)
    } else {
        RunState::Running
    }
}

// ── SimReport ─────────────────────────────────────────────────────────────────

/// Final statistics of a finished run.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub outcome:  Convergence,
    /// The master seed actually used, for replay.
    pub seed:     u64,
    /// Per-agent state after shutdown, by id.
    pub agents:   Vec<AgentSnapshot>,
    /// Exit reports in arrival order.
    pub exits:    Vec<TaskExit>,
    /// Agents whose thread had not exited when the join timeout elapsed.
    pub unjoined: Vec<AgentId>,
    pub elapsed:  Duration,
}

impl SimReport {
    /// The agent that found the food, if any.
    pub fn winner(&self) -> Option<&AgentSnapshot> {
        match self.outcome {
            Convergence::FoundFood { agent } => self.agents.get(agent.index()),
            Convergence::AllStopped => None,
        }
    }

    pub fn exit_reason(&self, agent: AgentId) -> Option<ExitReason> {
        self.exits.iter().find(|e| e.agent == agent).map(|e| e.reason)
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// A populated grid plus everything needed to run its agents.
///
/// Create via [`SimBuilder`][crate::SimBuilder]; consume with
/// [`run`][Self::run].
pub struct Simulation<P: DecisionPolicy> {
    pub config: SimConfig,

    /// The resolved master seed.
    pub seed: u64,

    grid:   SharedGrid,
    policy: Arc<P>,
    rngs:   AgentRngs,
    stop:   Arc<AtomicBool>,
}

/// Spawned agent threads; a slot is emptied once its handle is joined.
type Tasks = Vec<(AgentId, Option<JoinHandle<()>>)>;

impl<P: DecisionPolicy> Simulation<P> {
    pub(crate) fn new(config: SimConfig, seed: u64, grid: SharedGrid, policy: P, rngs: AgentRngs) -> Self {
        Self {
            config,
            seed,
            grid,
            policy: Arc::new(policy),
            rngs,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle for manual moves and snapshots, valid during and after
    /// [`run`][Self::run].
    pub fn handle(&self) -> SimHandle {
        SimHandle::new(self.grid.clone(), Arc::clone(&self.stop))
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Spawn one thread per autonomous agent and block until convergence.
    ///
    /// Every `poll_interval_ms` (or sooner, when an agent thread exits) the
    /// driver snapshots the grid and checks for convergence.  Once converged
    /// it raises the stop flag, waits at most `join_timeout_ms` for the
    /// threads to report back, and logs a warning for each one that did not.
    ///
    /// # Errors
    /// [`SimError::Spawn`] if the OS refuses a thread.  Threads already
    /// started are told to stop first.
    ///
    /// # Panics
    /// Re-raises the panic of any agent thread, which only happens when a
    /// grid invariant is broken.
    pub fn run<O: SimObserver>(self, observer: &mut O) -> SimResult<SimReport> {
        let Simulation { config, seed, grid, policy, rngs, stop } = self;
        let started = Instant::now();

        let (exit_tx, exit_rx) = crossbeam_channel::unbounded();
        // Never sent on; dropping the sender wakes every pausing agent.
        let (wake_tx, wake_rx) = crossbeam_channel::bounded::<()>(0);

        let roster = grid.snapshot().agents;
        let mut log = ExitLog::new(roster.len());
        let mut tasks: Tasks = Vec::new();

        for (agent, rng) in rngs.into_agents() {
            let info = &roster[agent.index()];
            if info.control != AgentControl::Autonomous {
                continue;
            }
            let task = AgentTask {
                agent,
                grid:         grid.clone(),
                policy:       Arc::clone(&policy),
                rng,
                stop:         Arc::clone(&stop),
                wake:         wake_rx.clone(),
                exits:        exit_tx.clone(),
                pause_min_ms: config.pause_min_ms,
                jitter_ms:    config.pause_jitter_ms,
                move_budget:  config.move_budget,
            };
            let spawned = thread::Builder::new()
                .name(format!("agent-{}", info.tag))
                .spawn(move || task.run());
            match spawned {
                Ok(handle) => tasks.push((agent, Some(handle))),
                Err(source) => {
                    stop.store(true, Ordering::Release);
                    drop(wake_tx);
                    return Err(SimError::Spawn { tag: info.tag.clone(), source });
                }
            }
        }
        drop(wake_rx);

        observer.on_start(&grid.snapshot());
        info!(agents = roster.len(), threads = tasks.len(), seed, policy = policy.name(), "simulation started");

        // ── Detection loop ────────────────────────────────────────────────
        let poll = config.poll_interval();
        let outcome = loop {
            // The driver still holds `exit_tx`, so this can only time out.
            if let Ok(exit) = exit_rx.recv_timeout(poll) {
                log.record(exit, observer);
                log.drain(&exit_rx, observer);
            }
            reap_panicked(&mut tasks, &log);

            let snapshot = grid.snapshot();
            observer.on_poll(started.elapsed(), &snapshot);
            if let RunState::Converged(outcome) = assess(&snapshot, &log.exited) {
                break outcome;
            }
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(%outcome, elapsed_ms, "converged");

        // ── Shutdown ──────────────────────────────────────────────────────
        stop.store(true, Ordering::Release);
        drop(wake_tx);

        let deadline = Instant::now() + config.join_timeout();
        while tasks.iter().any(|(agent, _)| !log.has_exited(*agent)) {
            match exit_rx.recv_deadline(deadline) {
                Ok(exit) => log.record(exit, observer),
                Err(_) => break,
            }
        }

        let mut unjoined = Vec::new();
        for (agent, slot) in tasks {
            let Some(handle) = slot else { continue };
            if log.has_exited(agent) {
                if handle.join().is_err() {
                    error!(agent = agent.0, "agent thread panicked after reporting its exit");
                }
            } else {
                let tag = &roster[agent.index()].tag;
                warn!(agent = agent.0, %tag, "agent task did not exit within the join timeout");
                unjoined.push(agent);
            }
        }

        let agents = grid.snapshot().agents;
        observer.on_converged(&outcome, &agents);
        for a in &agents {
            info!(agent = a.id.0, "{a}");
        }

        Ok(SimReport {
            outcome,
            seed,
            agents,
            exits: log.exits,
            unjoined,
            elapsed: started.elapsed(),
        })
    }
}

// ── Exit bookkeeping ──────────────────────────────────────────────────────────

struct ExitLog {
    exited: Vec<bool>,
    exits:  Vec<TaskExit>,
}

impl ExitLog {
    fn new(agents: usize) -> Self {
        Self { exited: vec![false; agents], exits: Vec::new() }
    }

    fn has_exited(&self, agent: AgentId) -> bool {
        self.exited.get(agent.index()).copied().unwrap_or(false)
    }

    fn record<O: SimObserver>(&mut self, exit: TaskExit, observer: &mut O) {
        if let Some(flag) = self.exited.get_mut(exit.agent.index()) {
            *flag = true;
        }
        observer.on_agent_exit(&exit);
        self.exits.push(exit);
    }

    fn drain<O: SimObserver>(&mut self, rx: &Receiver<TaskExit>, observer: &mut O) {
        while let Ok(exit) = rx.try_recv() {
            self.record(exit, observer);
        }
    }
}

/// Join threads that finished without reporting an exit and re-raise their
/// panic.  A thread that finished cleanly has its report still in flight.
fn reap_panicked(tasks: &mut Tasks, log: &ExitLog) {
    for (agent, slot) in tasks.iter_mut() {
        if log.has_exited(*agent) || !slot.as_ref().is_some_and(JoinHandle::is_finished) {
            continue;
        }
        if let Some(handle) = slot.take()
            && let Err(payload) = handle.join()
        {
            error!(agent = agent.0, "agent thread panicked");
            std::panic::resume_unwind(payload);
        }
    }
}
