//! Failures of a single calculator transition.

use serde::Serialize;
use thiserror::Error;

use super::evaluation::UnaryFn;

/// Token shown on the display whenever a transition fails.
pub const ERROR_TOKEN: &str = "Error";

/// Why a calculation could not produce a number.
///
/// These never escape the engine: a failing transition stores the error in
/// the state and shows [`ERROR_TOKEN`] instead.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum CalcError {
    #[error("division by zero")]
    DivideByZero,

    #[error("{0} is undefined for this input")]
    InvalidDomain(UnaryFn),

    #[error("'{0}' is not a number")]
    InvalidOperand(String),

    #[error("result is not a finite number")]
    NotFinite,
}
