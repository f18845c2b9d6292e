//! Calculator module: the keypad state machine and its arithmetic.
//!
//! This module provides functionality to:
//! - Evaluate binary operators and scientific functions on display values
//! - Drive the calculator state through keypad intents
//! - Map keyboard keys and typed lines to intents
//! - Copy results to the clipboard

mod clipboard;
mod error;
mod evaluation;
mod keys;
mod state;

pub use clipboard::{ClipboardError, copy_display, text_for_clipboard};
pub use error::{CalcError, ERROR_TOKEN};
pub use evaluation::{BinaryOp, SIGNIFICANT_DIGITS, UnaryFn, format_result, number_to_string};
pub use keys::{KeyError, intent_for_key, looks_like_keypad_input, parse_keys};
pub use state::{CalculatorState, Digit, Entry, Intent, MAX_ENTRY_DIGITS};
