//! The single owner of calculator state for a front end.

use tracing::{debug, info};

use crate::ai::{AiError, Solver};
use crate::calculator::{CalculatorState, Intent};

/// Holds the calculator state and the optional AI solver.
///
/// All state changes go through [`Session::dispatch`]; AI answers enter the
/// calculator through the same path as an
/// [`Intent::IngestExternalResult`].
pub struct Session<S> {
    state: CalculatorState,
    /// The solver, or why there is none.
    solver: Result<S, AiError>,
}

impl<S: Solver> Session<S> {
    pub fn new(state: CalculatorState, solver: Result<S, AiError>) -> Self {
        if let Err(err) = &solver {
            info!(reason = %err, "AI solver unavailable");
        }
        Self { state, solver }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn dispatch(&mut self, intent: Intent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(intent);
    }

    pub fn dispatch_all(&mut self, intents: impl IntoIterator<Item = Intent>) {
        for intent in intents {
            self.dispatch(intent);
        }
    }

    /// Recall the `position`-th most recent history item, counting from 1.
    ///
    /// Returns `false` when there is no such item.
    pub fn select_history(&mut self, position: usize) -> bool {
        match self.state.history().get_latest(position).cloned() {
            Some(item) => {
                self.dispatch(Intent::SelectFromHistory(item));
                true
            }
            None => false,
        }
    }

    /// Send a free-text question to the solver and show the answer.
    ///
    /// The session is borrowed mutably for the whole round trip, so only one
    /// request can be in flight. On failure the state is left untouched.
    pub async fn ask(&mut self, question: &str) -> Result<&str, AiError> {
        let solver = self.solver.as_ref().map_err(Clone::clone)?;
        let answer = solver.solve(question).await?;

        debug!(%answer, "AI answer received");
        self.dispatch(Intent::IngestExternalResult(answer));
        Ok(self.state.current_value())
    }
}
