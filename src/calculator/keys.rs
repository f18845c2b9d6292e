//! Keyboard mapping and keypad input parsing.
//!
//! Turns key names and typed lines into [`Intent`]s for the engine.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::evaluation::{BinaryOp, UnaryFn};
use super::state::{Entry, Intent};

lazy_static! {
    /// Matches lines made only of digits, operators and keypad symbols.
    static ref KEYPAD_SAFE_CHARS: Regex = Regex::new(
        r"^[\d\s\.\+\-\*/×÷\^=%√²⌫]+$"
    ).unwrap();

    /// One keypad token at the start of the input. Longer names come first so
    /// `sqrt` wins over `sq` and `cos` over `c`.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"(?i)^(?:log10|sqrt|square|clear|back|sin|cos|tan|log|esc|del|ac|ln|sq|x²|√|⌫|c|x|[0-9]|[\.\+\-\*/×÷\^=%])"
    ).unwrap();
}

#[derive(Debug, Error, PartialEq)]
pub enum KeyError {
    #[error("unrecognised key '{0}'")]
    UnknownKey(String),
}

/// Map a keyboard key name to an intent.
///
/// Digits and `.` enter digits, `Enter` and `=` evaluate, `Backspace`
/// deletes, `Escape` clears, and `+ - * /` are the binary operators.
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "Enter" | "=" => Some(Intent::Equals),
        "Backspace" => Some(Intent::Backspace),
        "Escape" => Some(Intent::Clear),
        "+" | "-" | "*" | "/" => BinaryOp::from_symbol(key).map(Intent::ApplyOperator),
        _ => Entry::from_key(key)
            .filter(|entry| *entry != Entry::DoubleZero)
            .map(Intent::EnterDigit),
    }
}

/// Parse a typed line of keypad input into intents.
///
/// Words are separated by whitespace; a word that is exactly `00` presses
/// the double-zero key, anything else is read one key at a time, so
/// `12.5*4=` and `12.5 × 4 =` are the same input. Fails on the first unknown
/// key, in which case nothing should be applied.
pub fn parse_keys(line: &str) -> Result<Vec<Intent>, KeyError> {
    let mut intents = Vec::new();

    for word in line.split_whitespace() {
        if word == "00" {
            intents.push(Intent::EnterDigit(Entry::DoubleZero));
            continue;
        }

        let mut rest = word;
        while !rest.is_empty() {
            let token = KEY_TOKEN
                .find(rest)
                .map(|m| m.as_str())
                .ok_or_else(|| KeyError::UnknownKey(rest.to_string()))?;
            let intent =
                token_intent(token).ok_or_else(|| KeyError::UnknownKey(token.to_string()))?;

            intents.push(intent);
            rest = &rest[token.len()..];
        }
    }

    Ok(intents)
}

/// Check if a line looks like keypad input rather than a free-text question.
///
/// This is a fast pre-check; [`parse_keys`] is the authority.
pub fn looks_like_keypad_input(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && KEYPAD_SAFE_CHARS.is_match(trimmed)
}

fn token_intent(token: &str) -> Option<Intent> {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "=" => Some(Intent::Equals),
        "%" => Some(Intent::Percent),
        "ac" | "c" | "clear" | "esc" => Some(Intent::Clear),
        "del" | "back" | "⌫" => Some(Intent::Backspace),
        other => Entry::from_key(other)
            .map(Intent::EnterDigit)
            .or_else(|| BinaryOp::from_symbol(other).map(Intent::ApplyOperator))
            .or_else(|| UnaryFn::from_name(other).map(Intent::ApplyUnary)),
    }
}
