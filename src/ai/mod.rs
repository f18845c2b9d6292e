//! The "ask AI" path: free-text questions answered by a language model.

mod prompt;
mod solver;

pub use prompt::{SYSTEM_PROMPT, parse_trigger};
pub use solver::{AiError, GeminiSolver, Solver};
