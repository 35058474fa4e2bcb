//! The `DecisionPolicy` trait: the extension point for agent strategies.

use fg_core::{AgentId, AgentRng};
use fg_grid::SharedGrid;
use fg_mobility::MoveOutcome;

use crate::PolicyResult;

/// Pluggable move selection.
///
/// One call is one "turn" for `agent`: the policy makes up to four move
/// attempts and returns the first accepted outcome.  The simulation driver
/// calls this in a loop from the agent's own thread, pausing between turns.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysUp;
///
/// impl DecisionPolicy for AlwaysUp {
///     fn decide_and_move(&self, agent: AgentId, grid: &SharedGrid, _rng: &mut AgentRng)
///         -> PolicyResult<MoveOutcome>
///     {
///         Ok(request_move(grid, agent, Direction::Up)?)
///     }
/// }
/// ```
pub trait DecisionPolicy: Send + Sync + 'static {
    /// Choose and perform one move for `agent`.
    ///
    /// # Errors
    /// [`PolicyError::NoValidMove`][crate::PolicyError::NoValidMove] when no
    /// direction worked this turn; other variants are policy-specific.
    fn decide_and_move(
        &self,
        agent: AgentId,
        grid:  &SharedGrid,
        rng:   &mut AgentRng,
    ) -> PolicyResult<MoveOutcome>;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str {
        "custom"
    }
}
