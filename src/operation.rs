//! Strict request parsing: one JSON body in, one [`Operation`] out.
//!
//! The endpoint's body is a dynamic single-key object; this module pins it
//! down to a tagged union so dispatch is total over the five recognized
//! operations and anything else fails closed. Validation order matters:
//! body shape, then key arity, then the per-key value — a two-key request
//! is rejected for arity before any key name is inspected.

use serde_json::Value;
use thiserror::Error;

/// Upper bound for the `fibonacci` argument.
pub const FIBONACCI_MAX: i64 = 200;

/// A validated request, one variant per recognized operation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `fibonacci`: first `n` terms, `0 <= n <= 200`.
    Fibonacci(u32),
    /// `prime`: filter the array down to its primes.
    Prime(Vec<i64>),
    /// `lcm`: left-to-right lcm reduction.
    Lcm(Vec<i64>),
    /// `hcf`: left-to-right gcd reduction.
    Hcf(Vec<i64>),
    /// `AI`: single-word answer via the generative fallback chain.
    Ai(String),
}

/// Rejection reasons, each carrying the exact client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body was not a JSON object (null, array, scalar, or unparsable).
    #[error("Invalid JSON body.")]
    InvalidBody,

    /// Object had zero keys or more than one.
    #[error("Request must contain exactly one key.")]
    KeyArity,

    /// `fibonacci` value out of range or not an integer.
    #[error("fibonacci must be an integer between 0 and 200.")]
    FibonacciRange,

    /// Array-valued key was missing, empty, or had a non-integer element.
    #[error("{key} must be a non-empty integer array.")]
    IntegerArray { key: &'static str },

    /// `AI` value was not a string with non-whitespace content.
    #[error("AI must be a non-empty string.")]
    EmptyQuestion,

    /// Single key present but not one of the five recognized names.
    #[error("Unsupported key.")]
    UnsupportedKey,
}

impl Operation {
    /// Validate a parsed JSON body into an operation.
    pub fn parse(body: &Value) -> Result<Self, ValidationError> {
        let map = body.as_object().ok_or(ValidationError::InvalidBody)?;
        if map.len() != 1 {
            return Err(ValidationError::KeyArity);
        }
        let (key, value) = map.iter().next().ok_or(ValidationError::KeyArity)?;

        match key.as_str() {
            "fibonacci" => match whole_number(value) {
                Some(n) if (0..=FIBONACCI_MAX).contains(&n) => Ok(Self::Fibonacci(n as u32)),
                _ => Err(ValidationError::FibonacciRange),
            },
            "prime" => Ok(Self::Prime(integer_array(value, "prime")?)),
            "lcm" => Ok(Self::Lcm(integer_array(value, "lcm")?)),
            "hcf" => Ok(Self::Hcf(integer_array(value, "hcf")?)),
            "AI" => match value.as_str() {
                Some(q) if !q.trim().is_empty() => Ok(Self::Ai(q.to_string())),
                _ => Err(ValidationError::EmptyQuestion),
            },
            _ => Err(ValidationError::UnsupportedKey),
        }
    }
}

/// Non-empty array whose every element is a whole number. One bad element
/// rejects the whole request.
fn integer_array(value: &Value, key: &'static str) -> Result<Vec<i64>, ValidationError> {
    let items = value
        .as_array()
        .filter(|a| !a.is_empty())
        .ok_or(ValidationError::IntegerArray { key })?;
    items
        .iter()
        .map(|v| whole_number(v).ok_or(ValidationError::IntegerArray { key }))
        .collect()
}

/// A JSON number as i64. Whole-valued float forms (`2.0`, `1e2`) count as
/// integers; anything with a fractional part does not.
fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
