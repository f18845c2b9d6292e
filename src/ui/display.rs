//! Text rendering of the calculator.
//!
//! Renders the display as three right-aligned rows:
//! - The mode tag and the pending operation ("Adding", "Dividing", ...)
//! - The staged expression, e.g. `5 +`
//! - The current value

use crate::calculator::{CalculatorState, UnaryFn};
use crate::history::HistoryLog;

const MODE_COLUMN: usize = 4;
const KEY_CELL: usize = 5;

const BASIC_ROWS: [[&str; 4]; 5] = [
    ["AC", "⌫", "%", "÷"],
    ["7", "8", "9", "×"],
    ["4", "5", "6", "-"],
    ["1", "2", "3", "+"],
    ["0", "00", ".", "="],
];

/// Functions in the extra left-hand column of the scientific keypad.
const SCIENTIFIC_COLUMN: [UnaryFn; 5] = [
    UnaryFn::Sin,
    UnaryFn::Cos,
    UnaryFn::Tan,
    UnaryFn::Ln,
    UnaryFn::Log10,
];

/// Render the display for `state` at the given width.
pub fn render_display(state: &CalculatorState, width: usize) -> String {
    let mode = if state.is_scientific() { "SCI" } else { "STD" };
    let label = state.operator().map(|op| op.label()).unwrap_or("");

    let expression = match (state.previous_value(), state.operator()) {
        (Some(previous), Some(op)) => format!("{} {}", previous, op),
        _ => String::new(),
    };

    [
        format!(
            "{:<mode_width$}{:>label_width$}",
            mode,
            label,
            mode_width = MODE_COLUMN,
            label_width = width.saturating_sub(MODE_COLUMN)
        ),
        format!("{:>width$}", expression, width = width),
        format!("{:>width$}", state.current_value(), width = width),
    ]
    .join("\n")
}

/// Render the keypad layout for the current mode.
pub fn render_keypad(scientific: bool) -> String {
    let mut lines: Vec<String> = BASIC_ROWS
        .iter()
        .enumerate()
        .map(|(row, keys)| {
            let function = scientific
                .then(|| format!("{:<width$}", SCIENTIFIC_COLUMN[row].key_label(), width = KEY_CELL))
                .unwrap_or_default();
            let cells: String = keys
                .iter()
                .enumerate()
                .map(|(column, &key)| {
                    // The scientific keypad trades backspace for square root.
                    let key = if scientific && row == 0 && column == 1 {
                        UnaryFn::Sqrt.key_label()
                    } else {
                        key
                    };
                    format!("{:<width$}", key, width = KEY_CELL)
                })
                .collect();
            format!("{}{}", function, cells).trim_end().to_string()
        })
        .collect();

    if scientific {
        lines.push("also: x² (sq), ^ (power), del (backspace)".to_string());
    }
    lines.join("\n")
}

/// Render the history panel, most recent first, numbered for `use N`.
pub fn render_history(history: &HistoryLog) -> String {
    if history.is_empty() {
        return "No history yet".to_string();
    }

    history
        .latest_first()
        .enumerate()
        .map(|(index, item)| format!("{:>3}. {} {}", index + 1, item.expression, item.result))
        .collect::<Vec<_>>()
        .join("\n")
}
