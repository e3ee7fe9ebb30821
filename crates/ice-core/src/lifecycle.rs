//! Run lifecycle state machine.
//!
//! ```text
//! CREATED -> PROVISIONED -> CONTEXT_READY -> EXECUTING -> VALIDATING -> COMMITTED
//!                                               |             |
//!                                               +-> ABORTED <-+
//!
//! COMMITTED | ABORTED | TERMINATED_BY_RUNTIME -> TERMINATED
//! ```
//!
//! `transition` follows the table above strictly. `abort` and
//! `terminate_by_runtime` are interrupts: they jump from any non-terminal
//! state. Nothing leaves TERMINATED.
//!
//! The machine is a pure guard and emits no events. It is not `Sync`-shared
//! by itself; wrap it in a mutex if several threads drive the same run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InvalidStateTransition;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Initial state.
    Created,
    /// Resources provisioned.
    Provisioned,
    /// Context resolved.
    ContextReady,
    /// Executing.
    Executing,
    /// Results under validation.
    Validating,
    /// Results committed.
    Committed,
    /// Self-directed stop.
    Aborted,
    /// Externally imposed kill.
    TerminatedByRuntime,
    /// Terminal.
    Terminated,
}

impl RunState {
    /// Every state.
    pub const ALL: [RunState; 9] = [
        RunState::Created,
        RunState::Provisioned,
        RunState::ContextReady,
        RunState::Executing,
        RunState::Validating,
        RunState::Committed,
        RunState::Aborted,
        RunState::TerminatedByRuntime,
        RunState::Terminated,
    ];

    /// Upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            RunState::Created => "CREATED",
            RunState::Provisioned => "PROVISIONED",
            RunState::ContextReady => "CONTEXT_READY",
            RunState::Executing => "EXECUTING",
            RunState::Validating => "VALIDATING",
            RunState::Committed => "COMMITTED",
            RunState::Aborted => "ABORTED",
            RunState::TerminatedByRuntime => "TERMINATED_BY_RUNTIME",
            RunState::Terminated => "TERMINATED",
        }
    }

    /// Successors reachable through `transition`.
    pub const fn successors(self) -> &'static [RunState] {
        match self {
            RunState::Created => &[RunState::Provisioned],
            RunState::Provisioned => &[RunState::ContextReady],
            RunState::ContextReady => &[RunState::Executing],
            RunState::Executing => &[RunState::Validating, RunState::Aborted],
            RunState::Validating => &[RunState::Committed, RunState::Aborted],
            RunState::Committed | RunState::Aborted | RunState::TerminatedByRuntime => {
                &[RunState::Terminated]
            }
            RunState::Terminated => &[],
        }
    }

    /// States from which `finalize` is legal.
    pub const fn is_conclusive(self) -> bool {
        matches!(
            self,
            RunState::Committed | RunState::Aborted | RunState::TerminatedByRuntime
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunState {
    type Err = InvalidStateTransition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RunState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| InvalidStateTransition::UnknownState(s.to_string()))
    }
}

/// Per-run lifecycle guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStateMachine {
    state: RunState,
}

impl Default for RunStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStateMachine {
    /// Creates a machine in `CREATED`.
    pub fn new() -> Self {
        Self {
            state: RunState::Created,
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True once `TERMINATED`.
    pub fn is_terminal(&self) -> bool {
        self.state == RunState::Terminated
    }

    /// Targets `transition` would currently accept.
    pub fn allowed_targets(&self) -> &'static [RunState] {
        self.state.successors()
    }

    /// Moves along one edge of the transition table.
    pub fn transition(&mut self, to: RunState) -> Result<(), InvalidStateTransition> {
        if self.is_terminal() {
            return Err(InvalidStateTransition::AlreadyTerminated {
                attempted: to.to_string(),
            });
        }
        self.step(to)
    }

    /// Like [`transition`](Self::transition), with the target given by name.
    pub fn transition_named(&mut self, to: &str) -> Result<(), InvalidStateTransition> {
        if self.is_terminal() {
            return Err(InvalidStateTransition::AlreadyTerminated {
                attempted: to.to_string(),
            });
        }
        let to = to.parse::<RunState>()?;
        self.step(to)
    }

    fn step(&mut self, to: RunState) -> Result<(), InvalidStateTransition> {
        if !self.state.successors().contains(&to) {
            return Err(InvalidStateTransition::IllegalEdge {
                from: self.state,
                to,
            });
        }
        tracing::debug!(from = %self.state, to = %to, "run state transition");
        self.state = to;
        Ok(())
    }

    /// Self-directed stop from any non-terminal state. No-op once terminal.
    pub fn abort(&mut self) {
        if self.is_terminal() {
            return;
        }
        tracing::info!(from = %self.state, "run aborted");
        self.state = RunState::Aborted;
    }

    /// Externally imposed kill from any non-terminal state. No-op once terminal.
    pub fn terminate_by_runtime(&mut self) {
        if self.is_terminal() {
            return;
        }
        tracing::info!(from = %self.state, "run terminated by runtime");
        self.state = RunState::TerminatedByRuntime;
    }

    /// Closes the run; only legal from COMMITTED, ABORTED or TERMINATED_BY_RUNTIME.
    pub fn finalize(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.state.is_conclusive() {
            return Err(InvalidStateTransition::CannotFinalize { from: self.state });
        }
        tracing::debug!(from = %self.state, "run finalized");
        self.state = RunState::Terminated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for state in RunState::ALL {
            assert_eq!(state.as_str().parse::<RunState>().unwrap(), state);
        }
        assert_eq!(
            "RUNNING".parse::<RunState>(),
            Err(InvalidStateTransition::UnknownState("RUNNING".into()))
        );
    }

    #[test]
    fn only_terminated_has_no_successors() {
        for state in RunState::ALL {
            assert_eq!(state.successors().is_empty(), state == RunState::Terminated);
        }
    }

    #[test]
    fn serde_uses_upper_case_names() {
        assert_eq!(
            serde_json::to_string(&RunState::TerminatedByRuntime).unwrap(),
            "\"TERMINATED_BY_RUNTIME\""
        );
        assert_eq!(
            serde_json::to_string(&RunState::ContextReady).unwrap(),
            "\"CONTEXT_READY\""
        );
    }

    #[test]
    fn terminal_check_precedes_unknown_state() {
        let mut fsm = RunStateMachine::new();
        fsm.abort();
        fsm.finalize().unwrap();
        assert!(matches!(
            fsm.transition_named("NOPE"),
            Err(InvalidStateTransition::AlreadyTerminated { .. })
        ));
    }
}
