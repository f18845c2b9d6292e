//! Arithmetic used by the calculator engine.
//!
//! Operands travel through the engine as display strings, so everything here
//! parses its inputs, computes in `f64`, and hands back either a number or a
//! [`CalcError`]. Formatting back into display strings also lives here.

use std::fmt;

use serde::Serialize;

use super::error::CalcError;

/// Significant digits kept for results of equals and unary functions.
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Magnitudes outside `[EXPONENT_LOWER, EXPONENT_UPPER)` are printed in
/// exponent notation; everything else is printed as a plain decimal.
const EXPONENT_LOWER: f64 = 1e-6;
const EXPONENT_UPPER: f64 = 1e21;

/// A binary operator that can be staged between two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
    #[serde(rename = "^")]
    Power,
}

impl BinaryOp {
    /// Symbol used on the keypad and in history expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Power => "^",
        }
    }

    /// Word shown above the display while this operator is pending.
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Adding",
            Self::Subtract => "Subtracting",
            Self::Multiply => "Multiplying",
            Self::Divide => "Dividing",
            Self::Power => "Power",
        }
    }

    /// Parse an operator from its keypad symbol or its ASCII stand-in.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "×" | "*" | "x" => Some(Self::Multiply),
            "÷" | "/" => Some(Self::Divide),
            "^" => Some(Self::Power),
            _ => None,
        }
    }

    /// Apply the operator to two numbers.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => {
                if rhs == 0.0 {
                    return Err(CalcError::DivideByZero);
                }
                lhs / rhs
            }
            Self::Power => lhs.powf(rhs),
        };

        finite(value)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A scientific function applied to the current value alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Ln,
    Log10,
    Square,
}

impl UnaryFn {
    pub const ALL: [UnaryFn; 7] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sqrt,
        Self::Ln,
        Self::Log10,
        Self::Square,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "sqrt",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Square => "square",
        }
    }

    /// Short label printed on the scientific keypad.
    pub fn key_label(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "√",
            Self::Ln => "ln",
            Self::Log10 => "log",
            Self::Square => "x²",
        }
    }

    /// Parse a function from its name, keypad label or a common alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "sqrt" | "√" => Some(Self::Sqrt),
            "ln" => Some(Self::Ln),
            "log" | "log10" => Some(Self::Log10),
            "sq" | "square" | "x²" => Some(Self::Square),
            _ => None,
        }
    }

    /// Apply the function. Angles are in radians.
    pub fn apply(self, x: f64) -> Result<f64, CalcError> {
        let value = match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sqrt => {
                if x < 0.0 {
                    return Err(CalcError::InvalidDomain(self));
                }
                x.sqrt()
            }
            Self::Ln => {
                if x <= 0.0 {
                    return Err(CalcError::InvalidDomain(self));
                }
                x.ln()
            }
            Self::Log10 => {
                if x <= 0.0 {
                    return Err(CalcError::InvalidDomain(self));
                }
                x.log10()
            }
            Self::Square => x.powi(2),
        };

        finite(value)
    }
}

impl fmt::Display for UnaryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a display string into a number.
pub fn parse_operand(text: &str) -> Result<f64, CalcError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidOperand(text.to_string()))
}

/// Evaluate `lhs op rhs` where both operands are display strings.
pub fn evaluate_binary(lhs: &str, op: BinaryOp, rhs: &str) -> Result<f64, CalcError> {
    let a = parse_operand(lhs)?;
    let b = parse_operand(rhs)?;
    op.apply(a, b)
}

/// Evaluate a unary function on a display string.
pub fn evaluate_unary(func: UnaryFn, operand: &str) -> Result<f64, CalcError> {
    func.apply(parse_operand(operand)?)
}

/// Round to [`SIGNIFICANT_DIGITS`] and print in minimal form.
///
/// `10 / 4` becomes `2.5` and `0.1 + 0.2` becomes `0.3`.
pub fn format_result(value: f64) -> Result<String, CalcError> {
    let value = finite(value)?;
    let rounded: f64 = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .map_err(|_| CalcError::NotFinite)?;
    number_to_string(rounded)
}

/// Print a number in its shortest round-trip form without rounding.
///
/// Used for chained intermediate results and percent, which the keypad shows
/// unrounded.
pub fn number_to_string(value: f64) -> Result<String, CalcError> {
    let value = finite(value)?;
    if value == 0.0 {
        // Also catches negative zero.
        return Ok("0".to_string());
    }

    let magnitude = value.abs();
    if !(EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        Ok(format!("{:e}", value))
    } else {
        Ok(value.to_string())
    }
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite)
    }
}
