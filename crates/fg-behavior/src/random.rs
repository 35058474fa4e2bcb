//! The default policy: try the four directions in random order.

use fg_core::{AgentId, AgentRng, Direction};
use fg_grid::SharedGrid;
use fg_mobility::{request_move, MoveError, MoveOutcome};
use tracing::debug;

use crate::{DecisionPolicy, PolicyError, PolicyResult};

/// Shuffles `[Up, Right, Down, Left]` and tries each once, stopping at the
/// first accepted move.  A direction refused this turn is never retried in
/// the same turn, so a call makes at most four attempts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNoRepeat;

impl DecisionPolicy for RandomNoRepeat {
    fn decide_and_move(
        &self,
        agent: AgentId,
        grid:  &SharedGrid,
        rng:   &mut AgentRng,
    ) -> PolicyResult<MoveOutcome> {
        let mut order = Direction::ALL;
        rng.shuffle(&mut order);

        for direction in order {
            match request_move(grid, agent, direction) {
                Ok(outcome) => return Ok(outcome),
                Err(err @ MoveError::UnknownAgent(_)) => return Err(err.into()),
                Err(_) => continue,
            }
        }
        debug!(agent = agent.0, "all four directions refused");
        Err(PolicyError::NoValidMove(agent))
    }

    fn name(&self) -> &'static str {
        "random-no-repeat"
    }
}
