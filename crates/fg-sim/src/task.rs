//! The per-agent thread body and its exit report.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use fg_behavior::{DecisionPolicy, PolicyError};
use fg_core::{AgentId, AgentRng};
use fg_grid::SharedGrid;
use fg_mobility::{MoveError, MoveOutcome};
use tracing::{debug, info, trace};

// ── Exit reports ──────────────────────────────────────────────────────────────

/// Why an agent thread stopped.  None of these is a failure of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitReason {
    FoundFood,
    Died,
    /// The policy had no move left this turn.
    Stuck,
    /// The configured move budget ran out.
    BudgetExhausted,
    /// The driver asked all agents to stop.
    Cancelled,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::FoundFood       => "found_food",
            ExitReason::Died            => "died",
            ExitReason::Stuck           => "stuck",
            ExitReason::BudgetExhausted => "budget_exhausted",
            ExitReason::Cancelled       => "cancelled",
        }
    }
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sent by an agent thread on the exit channel just before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskExit {
    pub agent:  AgentId,
    pub reason: ExitReason,
    /// Decide-and-move cycles the agent completed.
    pub turns:  u64,
}

// ── AgentTask ─────────────────────────────────────────────────────────────────

/// Everything one agent thread owns.
pub(crate) struct AgentTask<P: DecisionPolicy> {
    pub agent:        AgentId,
    pub grid:         SharedGrid,
    pub policy:       Arc<P>,
    pub rng:          AgentRng,
    pub stop:         Arc<AtomicBool>,
    /// Disconnects when the driver shuts down; interrupts the pause.
    pub wake:         Receiver<()>,
    pub exits:        Sender<TaskExit>,
    pub pause_min_ms: u64,
    pub jitter_ms:    u64,
    pub move_budget:  u64,
}

impl<P: DecisionPolicy> AgentTask<P> {
    pub fn run(mut self) {
        let mut turns = 0;
        let reason = self.drive(&mut turns);
        match reason {
            ExitReason::Stuck => info!(agent = self.agent.0, turns, "agent stuck"),
            _ => debug!(agent = self.agent.0, turns, %reason, "agent task exiting"),
        }
        // The driver may already have stopped listening.
        let _ = self.exits.send(TaskExit { agent: self.agent, reason, turns });
    }

    fn drive(&mut self, turns: &mut u64) -> ExitReason {
        loop {
            if self.stop.load(Ordering::Acquire) {
                return ExitReason::Cancelled;
            }
            let status = self
                .grid
                .with(|g| g.agent(self.agent).map(|a| (a.is_alive(), a.has_found_food())));
            match status {
                Some((false, _)) | None => return ExitReason::Died,
                Some((true, true)) => return ExitReason::FoundFood,
                Some((true, false)) => {}
            }
            if *turns >= self.move_budget {
                return ExitReason::BudgetExhausted;
            }

            let result = self.policy.decide_and_move(self.agent, &self.grid, &mut self.rng);
            *turns += 1;
            match result {
                Ok(MoveOutcome::FoundFood(_)) => return ExitReason::FoundFood,
                Ok(MoveOutcome::Exploded(_)) => return ExitReason::Died,
                Ok(outcome) => trace!(agent = self.agent.0, ?outcome, "turn"),
                Err(PolicyError::NoValidMove(_) | PolicyError::ScriptExhausted(_)) => {
                    return ExitReason::Stuck;
                }
                Err(PolicyError::Move(MoveError::AgentDead(_) | MoveError::UnknownAgent(_))) => {
                    return ExitReason::Died;
                }
                Err(PolicyError::Move(err)) => trace!(agent = self.agent.0, %err, "turn refused"),
            }

            if !self.pause() {
                return ExitReason::Cancelled;
            }
        }
    }

    /// Sleep for one randomized pause.  Returns `false` if the driver shut
    /// down meanwhile.
    fn pause(&mut self) -> bool {
        let ms = self.rng.pause_ms(self.pause_min_ms, self.jitter_ms);
        !matches!(
            self.wake.recv_timeout(Duration::from_millis(ms)),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}
