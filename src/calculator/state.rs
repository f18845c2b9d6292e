//! The calculator's state machine.
//!
//! [`CalculatorState`] is a plain value. Every operation consumes the current
//! state and returns the next one, and [`CalculatorState::apply`] dispatches
//! an [`Intent`] to the matching operation. A failing calculation never
//! escapes as an error: it puts [`ERROR_TOKEN`] on the display, records the
//! [`CalcError`], and arms overwrite mode so the next digit starts afresh.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use super::error::{CalcError, ERROR_TOKEN};
use super::evaluation::{
    BinaryOp, UnaryFn, evaluate_binary, evaluate_unary, format_result, number_to_string,
    parse_operand,
};
use crate::history::{HistoryItem, HistoryLog};

/// Longest entry accepted from the keypad, not counting the decimal point.
pub const MAX_ENTRY_DIGITS: usize = 15;

const DIGIT_KEYS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// A decimal digit, `0` through `9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value < 10).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// A key that edits the number being entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    Digit(Digit),
    /// The `00` key.
    DoubleZero,
    /// The decimal point.
    Point,
}

impl Entry {
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(Self::Digit)
    }

    /// Parse `0`-`9`, `00` or `.`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "00" => Some(Self::DoubleZero),
            "." => Some(Self::Point),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c.to_digit(10).and_then(|d| Self::digit(d as u8)),
                    _ => None,
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Digit(d) => DIGIT_KEYS[usize::from(d.0)],
            Self::DoubleZero => "00",
            Self::Point => ".",
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a front end can ask the calculator to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    EnterDigit(Entry),
    ApplyOperator(BinaryOp),
    Equals,
    ApplyUnary(UnaryFn),
    Percent,
    Clear,
    Backspace,
    SelectFromHistory(HistoryItem),
    IngestExternalResult(String),
    ClearHistory,
    ToggleScientific,
}

/// The full calculator state for one session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculatorState {
    current_value: String,
    previous_value: Option<String>,
    operator: Option<BinaryOp>,
    overwrite_next: bool,
    error: Option<CalcError>,
    is_scientific: bool,
    history: HistoryLog,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            current_value: "0".to_string(),
            previous_value: None,
            operator: None,
            overwrite_next: false,
            error: None,
            is_scientific: false,
            history: HistoryLog::new(),
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in scientific mode.
    pub fn scientific() -> Self {
        Self {
            is_scientific: true,
            ..Self::default()
        }
    }

    /// The value on the display.
    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    /// The left operand staged for the pending operator.
    pub fn previous_value(&self) -> Option<&str> {
        self.previous_value.as_deref()
    }

    pub fn operator(&self) -> Option<BinaryOp> {
        self.operator
    }

    /// Whether the next digit replaces the display instead of extending it.
    pub fn overwrite_next(&self) -> bool {
        self.overwrite_next
    }

    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_scientific(&self) -> bool {
        self.is_scientific
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Run one intent through the matching transition.
    pub fn apply(self, intent: Intent) -> Self {
        trace!(?intent, "applying intent");
        match intent {
            Intent::EnterDigit(entry) => self.enter_digit(entry),
            Intent::ApplyOperator(op) => self.apply_operator(op),
            Intent::Equals => self.equals(),
            Intent::ApplyUnary(func) => self.apply_unary(func),
            Intent::Percent => self.percent(),
            Intent::Clear => self.clear(),
            Intent::Backspace => self.backspace(),
            Intent::SelectFromHistory(item) => self.select_from_history(&item),
            Intent::IngestExternalResult(text) => self.ingest_external_result(text),
            Intent::ClearHistory => self.clear_history(),
            Intent::ToggleScientific => self.toggle_scientific(),
        }
    }

    pub fn enter_digit(mut self, entry: Entry) -> Self {
        if self.overwrite_next {
            self.current_value = match entry {
                Entry::DoubleZero => "0".to_string(),
                Entry::Point => "0.".to_string(),
                digit @ Entry::Digit(_) => digit.to_string(),
            };
            self.overwrite_next = false;
            self.error = None;
            return self;
        }

        if self.current_value == "0" && entry != Entry::Point {
            if entry == Entry::DoubleZero {
                return self;
            }
            self.current_value = entry.to_string();
            self.error = None;
            return self;
        }

        if entry == Entry::Point && self.current_value.contains('.') {
            return self;
        }

        // Checked before appending, so `00` on a 14 digit entry still adds
        // both zeros.
        let length = self.current_value.chars().filter(|&c| c != '.').count();
        if length >= MAX_ENTRY_DIGITS {
            trace!(length, "entry is full, ignoring key");
            return self;
        }

        self.current_value.push_str(entry.as_str());
        self.error = None;
        self
    }

    pub fn apply_operator(mut self, op: BinaryOp) -> Self {
        // Operator pressed again before any new digit: just swap it.
        if self.operator.is_some() && self.overwrite_next {
            self.operator = Some(op);
            return self;
        }

        if self.previous_value.is_none() {
            self.previous_value = Some(self.current_value.clone());
            self.operator = Some(op);
            self.overwrite_next = true;
            self.error = None;
            return self;
        }

        let outcome = match (self.previous_value.as_deref(), self.operator) {
            (Some(previous), Some(pending)) => {
                evaluate_binary(previous, pending, &self.current_value)
            }
            _ => parse_operand(&self.current_value),
        }
        .and_then(number_to_string);

        match outcome {
            Ok(result) => {
                debug!(%result, next = %op, "chained calculation");
                self.previous_value = Some(result.clone());
                self.current_value = result;
                self.operator = Some(op);
                self.overwrite_next = true;
                self.error = None;
                self
            }
            // The failed step stays staged.
            Err(err) => self.fail(err),
        }
    }

    pub fn equals(mut self) -> Self {
        let (Some(op), Some(previous)) = (self.operator, self.previous_value.clone()) else {
            return self;
        };

        let outcome = evaluate_binary(&previous, op, &self.current_value)
            .and_then(format_result)
            .map(|result| {
                let expression = format!("{} {} {} =", previous, op, self.current_value);
                (expression, result)
            });

        match outcome {
            Ok((expression, result)) => {
                debug!(%expression, %result, "calculation complete");
                self.history.add(HistoryItem::new(expression, result.clone()));
                self.current_value = result;
                self.previous_value = None;
                self.operator = None;
                self.overwrite_next = true;
                self.error = None;
                self
            }
            Err(err) => self.fail(err),
        }
    }

    /// Apply a scientific function to the display value. A pending operator
    /// and its left operand stay staged.
    pub fn apply_unary(mut self, func: UnaryFn) -> Self {
        match evaluate_unary(func, &self.current_value).and_then(format_result) {
            Ok(result) => {
                self.current_value = result;
                self.overwrite_next = true;
                self.error = None;
                self
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn percent(mut self) -> Self {
        match parse_operand(&self.current_value).and_then(|value| number_to_string(value / 100.0)) {
            Ok(result) => {
                self.current_value = result;
                self.overwrite_next = true;
                self
            }
            Err(err) => self.fail(err),
        }
    }

    /// Reset the calculation. History and mode are kept.
    pub fn clear(mut self) -> Self {
        self.current_value = "0".to_string();
        self.previous_value = None;
        self.operator = None;
        self.overwrite_next = false;
        self.error = None;
        self
    }

    pub fn backspace(mut self) -> Self {
        if self.overwrite_next {
            // Results are never edited, only discarded.
            self.current_value = "0".to_string();
            self.overwrite_next = false;
            self.error = None;
        } else if self.current_value.chars().count() <= 1 {
            self.current_value = "0".to_string();
        } else {
            self.current_value.pop();
        }
        self
    }

    pub fn select_from_history(mut self, item: &HistoryItem) -> Self {
        self.current_value = item.result.clone();
        self.overwrite_next = true;
        self.error = None;
        self
    }

    /// Put text from outside the keypad (an AI answer) on the display.
    ///
    /// The text is not validated. If it is not a number, the next
    /// calculation that reads it fails.
    pub fn ingest_external_result(mut self, text: impl Into<String>) -> Self {
        self.current_value = text.into();
        self.overwrite_next = true;
        self.error = None;
        self
    }

    pub fn clear_history(mut self) -> Self {
        self.history.clear();
        self
    }

    pub fn toggle_scientific(mut self) -> Self {
        self.is_scientific = !self.is_scientific;
        self
    }

    fn fail(mut self, err: CalcError) -> Self {
        debug!(error = %err, "calculation failed");
        self.current_value = ERROR_TOKEN.to_string();
        self.error = Some(err);
        self.overwrite_next = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(state: CalculatorState, keys: &str) -> CalculatorState {
        keys.chars().fold(state, |state, key| {
            let entry = Entry::from_key(&key.to_string()).expect("keypad key");
            state.enter_digit(entry)
        })
    }

    fn start(keys: &str) -> CalculatorState {
        type_digits(CalculatorState::new(), keys)
    }

    #[test]
    fn test_digits_reconstruct_input() {
        assert_eq!(start("12.05").current_value(), "12.05");
        assert_eq!(start("0.5").current_value(), "0.5");
        assert_eq!(start("907").current_value(), "907");
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        assert_eq!(start("007").current_value(), "7");
        assert_eq!(start(".").current_value(), "0.");
    }

    #[test]
    fn test_double_zero_key() {
        let state = CalculatorState::new().enter_digit(Entry::DoubleZero);
        assert_eq!(state.current_value(), "0");

        let state = start("5").enter_digit(Entry::DoubleZero);
        assert_eq!(state.current_value(), "500");

        let state = start("5").apply_operator(BinaryOp::Add).enter_digit(Entry::DoubleZero);
        assert_eq!(state.current_value(), "0");
        assert!(!state.overwrite_next());
    }

    #[test]
    fn test_duplicate_point_rejected() {
        assert_eq!(start("1..2.3").current_value(), "1.23");
    }

    #[test]
    fn test_entry_length_cap() {
        let state = start("12345678901234567890");
        assert_eq!(state.current_value(), "123456789012345");

        // The decimal point does not count toward the cap.
        let state = start("1234567.8901234567");
        assert_eq!(state.current_value(), "1234567.89012345");
    }

    #[test]
    fn test_double_zero_at_cap_adds_both_zeros() {
        let state = start("12345678901234").enter_digit(Entry::DoubleZero);
        assert_eq!(state.current_value(), "1234567890123400");

        let state = type_digits(state, "5");
        assert_eq!(state.current_value(), "1234567890123400");
    }

    #[test]
    fn test_point_after_operator_starts_with_zero() {
        let state = start("5").apply_operator(BinaryOp::Add).enter_digit(Entry::Point);
        assert_eq!(state.current_value(), "0.");

        let state = type_digits(state, "5").equals();
        assert_eq!(state.current_value(), "5.5");

        let state = start("5").apply_operator(BinaryOp::Add).enter_digit(Entry::Point).equals();
        assert_eq!(state.current_value(), "5");
        assert!(!state.is_error());
    }

    #[test]
    fn test_simple_addition_records_history() {
        let state = start("5").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "3").equals();

        assert_eq!(state.current_value(), "8");
        assert_eq!(state.previous_value(), None);
        assert_eq!(state.operator(), None);
        assert!(state.overwrite_next());

        let history = state.history().list();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].expression, "5 + 3 =");
        assert_eq!(history[0].result, "8");
    }

    #[test]
    fn test_integer_result_has_no_decimals() {
        let state = start("2").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "2").equals();
        assert_eq!(state.current_value(), "4");

        let state = start("10").apply_operator(BinaryOp::Divide);
        let state = type_digits(state, "4").equals();
        assert_eq!(state.current_value(), "2.5");
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let state = start("5").apply_operator(BinaryOp::Multiply);
        let state = type_digits(state, "3").equals();
        let after = state.clone().equals().equals();

        assert_eq!(after, state);
        assert_eq!(after.history().len(), 1);
    }

    #[test]
    fn test_equals_without_operator_is_noop() {
        let state = start("42");
        assert_eq!(state.clone().equals(), state);
    }

    #[test]
    fn test_divide_by_zero() {
        let state = start("3").apply_operator(BinaryOp::Divide);
        let state = type_digits(state, "0").equals();

        assert_eq!(state.current_value(), ERROR_TOKEN);
        assert_eq!(state.error(), Some(&CalcError::DivideByZero));
        assert!(state.overwrite_next());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_failed_chain_keeps_staged_operation() {
        let state = start("3").apply_operator(BinaryOp::Divide);
        let state = type_digits(state, "0").apply_operator(BinaryOp::Add);

        assert_eq!(state.current_value(), ERROR_TOKEN);
        assert_eq!(state.previous_value(), Some("3"));
        assert_eq!(state.operator(), Some(BinaryOp::Divide));
        assert!(state.overwrite_next());
    }

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let state = start("3").apply_operator(BinaryOp::Divide);
        let state = type_digits(state, "0").equals();
        let state = type_digits(state, "7");

        assert_eq!(state.current_value(), "7");
        assert!(!state.is_error());
    }

    #[test]
    fn test_sqrt_of_negative() {
        let state = start("1")
            .apply_operator(BinaryOp::Subtract)
            .enter_digit(Entry::digit(2).unwrap())
            .equals()
            .apply_unary(UnaryFn::Sqrt);

        assert_eq!(state.current_value(), ERROR_TOKEN);
        assert_eq!(state.error(), Some(&CalcError::InvalidDomain(UnaryFn::Sqrt)));
        assert!(state.overwrite_next());
    }

    #[test]
    fn test_double_operator_replaces_pending() {
        let state = start("5")
            .apply_operator(BinaryOp::Add)
            .apply_operator(BinaryOp::Add);
        assert_eq!(state.operator(), Some(BinaryOp::Add));
        assert_eq!(state.previous_value(), Some("5"));
        assert_eq!(state.current_value(), "5");

        let state = state.apply_operator(BinaryOp::Subtract);
        assert_eq!(state.operator(), Some(BinaryOp::Subtract));
        assert_eq!(state.previous_value(), Some("5"));
    }

    #[test]
    fn test_chained_operators_evaluate_left_to_right() {
        let state = start("2").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "3").apply_operator(BinaryOp::Multiply);

        assert_eq!(state.current_value(), "5");
        assert_eq!(state.previous_value(), Some("5"));
        assert_eq!(state.operator(), Some(BinaryOp::Multiply));

        let state = type_digits(state, "4").equals();
        assert_eq!(state.current_value(), "20");
        assert_eq!(state.history().list()[0].expression, "5 × 4 =");
    }

    #[test]
    fn test_chained_result_is_not_rounded() {
        let state = start("0.1").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "0.2").apply_operator(BinaryOp::Add);
        assert_eq!(state.current_value(), "0.30000000000000004");

        let state = start("0.1").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "0.2").equals();
        assert_eq!(state.current_value(), "0.3");
    }

    #[test]
    fn test_power() {
        let state = start("2").apply_operator(BinaryOp::Power);
        let state = type_digits(state, "10").equals();
        assert_eq!(state.current_value(), "1024");
    }

    #[test]
    fn test_unary_leaves_pending_operation() {
        let state = start("9").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "16").apply_unary(UnaryFn::Sqrt);

        assert_eq!(state.current_value(), "4");
        assert_eq!(state.previous_value(), Some("9"));
        assert_eq!(state.operator(), Some(BinaryOp::Add));

        let state = state.equals();
        assert_eq!(state.current_value(), "13");
        assert_eq!(state.history().list()[0].expression, "9 + 4 =");
    }

    #[test]
    fn test_log_of_zero() {
        let state = CalculatorState::new().apply_unary(UnaryFn::Ln);
        assert_eq!(state.current_value(), ERROR_TOKEN);

        let state = CalculatorState::new().apply_unary(UnaryFn::Log10);
        assert_eq!(state.error(), Some(&CalcError::InvalidDomain(UnaryFn::Log10)));
    }

    #[test]
    fn test_square() {
        let state = start("12").apply_unary(UnaryFn::Square);
        assert_eq!(state.current_value(), "144");
        assert!(state.overwrite_next());
    }

    #[test]
    fn test_percent() {
        let state = start("50").percent();
        assert_eq!(state.current_value(), "0.5");
        assert!(state.overwrite_next());

        let state = start("5").percent();
        assert_eq!(state.current_value(), "0.05");
    }

    #[test]
    fn test_clear_keeps_history() {
        let state = start("5").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "3").equals();
        let state = type_digits(state, "7")
            .apply_operator(BinaryOp::Divide)
            .enter_digit(Entry::digit(0).unwrap())
            .equals()
            .clear();

        assert_eq!(state.current_value(), "0");
        assert_eq!(state.previous_value(), None);
        assert_eq!(state.operator(), None);
        assert!(!state.overwrite_next());
        assert!(state.error().is_none());
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_backspace() {
        assert_eq!(start("120").backspace().current_value(), "12");
        assert_eq!(start("5").backspace().current_value(), "0");
        assert_eq!(start("0").backspace().current_value(), "0");
    }

    #[test]
    fn test_backspace_after_result_clears() {
        let state = start("2").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "3").equals();
        assert_eq!(state.current_value(), "5");

        let state = state.backspace();
        assert_eq!(state.current_value(), "0");
        assert!(!state.overwrite_next());
    }

    #[test]
    fn test_select_from_history() {
        let state = start("6").apply_operator(BinaryOp::Multiply);
        let state = type_digits(state, "7").equals().clear();
        let item = state.history().list()[0].clone();

        let state = state
            .apply_operator(BinaryOp::Add)
            .select_from_history(&item);
        assert_eq!(state.current_value(), "42");
        assert!(state.overwrite_next());
        assert_eq!(state.operator(), Some(BinaryOp::Add));
        assert_eq!(state.previous_value(), Some("0"));

        // Typing replaces the recalled value.
        let state = type_digits(state, "1");
        assert_eq!(state.current_value(), "1");
    }

    #[test]
    fn test_ingest_external_result() {
        let state = start("3")
            .apply_operator(BinaryOp::Divide)
            .enter_digit(Entry::digit(0).unwrap())
            .equals()
            .clear()
            .ingest_external_result("42");
        assert_eq!(state.current_value(), "42");
        assert!(state.overwrite_next());
        assert!(!state.is_error());

        let state = state.apply_operator(BinaryOp::Add).enter_digit(Entry::digit(1).unwrap()).equals();
        assert_eq!(state.current_value(), "43");
    }

    #[test]
    fn test_non_numeric_external_result_fails_later() {
        let state = CalculatorState::new().ingest_external_result("about twelve");
        assert_eq!(state.current_value(), "about twelve");

        let state = state
            .apply_operator(BinaryOp::Add)
            .enter_digit(Entry::digit(1).unwrap())
            .equals();
        assert_eq!(state.current_value(), ERROR_TOKEN);
        assert_eq!(
            state.error(),
            Some(&CalcError::InvalidOperand("about twelve".to_string()))
        );
    }

    #[test]
    fn test_apply_dispatches_intents() {
        let state = [
            Intent::EnterDigit(Entry::digit(5).unwrap()),
            Intent::ApplyOperator(BinaryOp::Add),
            Intent::EnterDigit(Entry::digit(3).unwrap()),
            Intent::Equals,
            Intent::ToggleScientific,
        ]
        .into_iter()
        .fold(CalculatorState::new(), CalculatorState::apply);

        assert_eq!(state.current_value(), "8");
        assert!(state.is_scientific());
        assert_eq!(state.history().len(), 1);

        let state = state.apply(Intent::ClearHistory);
        assert!(state.history().is_empty());
        assert_eq!(state.current_value(), "8");
    }

    #[test]
    fn test_entry_from_key() {
        assert_eq!(Entry::from_key("7"), Some(Entry::digit(7).unwrap()));
        assert_eq!(Entry::from_key("00"), Some(Entry::DoubleZero));
        assert_eq!(Entry::from_key("."), Some(Entry::Point));
        assert_eq!(Entry::from_key("a"), None);
        assert_eq!(Entry::from_key("12"), None);
        assert_eq!(Entry::digit(10), None);
        assert_eq!(Entry::digit(255), None);
    }

    #[test]
    fn test_every_digit_prints_itself() {
        for value in 0..10 {
            let digit = Digit::new(value).unwrap();
            assert_eq!(digit.value(), value);
            assert_eq!(Entry::Digit(digit).as_str(), value.to_string());
        }
        assert_eq!(Digit::new(10), None);
    }

    #[test]
    fn test_json_snapshot() {
        let state = start("3").apply_operator(BinaryOp::Divide);
        let state = type_digits(state, "0").equals();
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["current_value"], "Error");
        assert_eq!(json["previous_value"], "3");
        assert_eq!(json["operator"], "÷");
        assert_eq!(json["error"], serde_json::json!({ "kind": "DivideByZero" }));
        assert_eq!(json["history"], serde_json::json!([]));

        let state = start("5").apply_operator(BinaryOp::Add);
        let state = type_digits(state, "3").equals();
        let state = type_digits(state.apply(Intent::Clear), "2").apply_operator(BinaryOp::Multiply);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["operator"], "×");
        assert_eq!(json["previous_value"], "2");
        assert_eq!(json["error"], serde_json::Value::Null);
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["expression"], "5 + 3 =");
        assert_eq!(history[0]["result"], "8");
    }
}
