// ============================================================
// Layer 3: Pipeline and Run State
// ============================================================
// The pipeline is a strictly linear state machine:
//
//   Idle → Loaded → Split → Trained → Evaluated → Recorded → Done
//
// Any non-terminal state may drop to Failed. Done and Failed are
// terminal; nothing leaves them.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Loaded,
    Split,
    Trained,
    Evaluated,
    Recorded,
    Done,
    Failed,
}

impl PipelineState {
    /// The state that follows `self` on the happy path.
    pub fn successor(self) -> Option<PipelineState> {
        use PipelineState::*;
        match self {
            Idle      => Some(Loaded),
            Loaded    => Some(Split),
            Split     => Some(Trained),
            Trained   => Some(Evaluated),
            Evaluated => Some(Recorded),
            Recorded  => Some(Done),
            Done | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Move to `to`, rejecting anything other than the next step
    /// or a failure from a live state.
    pub fn advance(self, to: PipelineState) -> PipelineResult<PipelineState> {
        let legal = match to {
            PipelineState::Failed => !self.is_terminal(),
            _ => self.successor() == Some(to),
        };
        if legal {
            Ok(to)
        } else {
            Err(PipelineError::InvalidTransition { from: self, to })
        }
    }
}

/// Final status written by the run recorder when a run closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}
