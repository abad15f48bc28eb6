//! Pre-flight argument validation.
//!
//! Every write operation validates its arguments with these helpers *before*
//! a request is built, so a bad call fails synchronously with
//! [`Error::InvalidArgument`] naming the offending parameter and never
//! reaches the network.

use crate::entities::InputType;
use crate::error::{Error, Result};

/// Minimum trimmed length accepted for a project name.
pub const MIN_PROJECT_NAME_LEN: usize = 4;

/// Path identifiers must be positive.
pub fn positive_id(param: &'static str, id: i64) -> Result<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            param,
            format!("must be a positive identifier, got {id}"),
        ))
    }
}

/// Required string fields must be non-empty after trimming.
pub fn required_text(param: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid_argument(param, "must not be empty or whitespace"))
    } else {
        Ok(())
    }
}

/// Required string with a minimum trimmed length.
pub fn min_len_text(param: &'static str, value: &str, min: usize) -> Result<()> {
    required_text(param, value)?;
    let len = value.trim().len();
    if len < min {
        Err(Error::invalid_argument(
            param,
            format!("must be at least {min} characters, got {len}"),
        ))
    } else {
        Ok(())
    }
}

/// Parallel arrays must agree with the declared count.
pub fn matching_len(param: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            param,
            format!("expected length {expected}, got {actual}"),
        ))
    }
}

/// Collections that must carry at least one element.
pub fn non_empty<T>(param: &'static str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        Err(Error::invalid_argument(param, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Every row must have exactly `width` columns.
pub fn uniform_rows(param: &'static str, rows: &[Vec<f64>], width: usize) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(Error::invalid_argument(
                param,
                format!(
                    "row {index} has length {}, expected {width}",
                    row.len()
                ),
            ));
        }
    }
    Ok(())
}

/// Parse input-type tokens case-insensitively against the closed set,
/// naming the first offending value.
pub fn input_types(param: &'static str, raw: &[String]) -> Result<Vec<InputType>> {
    raw.iter()
        .map(|token| {
            InputType::parse(token).ok_or_else(|| {
                Error::invalid_argument(
                    param,
                    format!(
                        "unknown input type `{token}`; expected one of boolean, category, float, integer"
                    ),
                )
            })
        })
        .collect()
}

/// Category lists may be empty, but may not contain empty entries.
pub fn categories(param: &'static str, values: &[String]) -> Result<()> {
    for (index, category) in values.iter().enumerate() {
        if category.trim().is_empty() {
            return Err(Error::invalid_argument(
                param,
                format!("entry {index} is empty"),
            ));
        }
    }
    Ok(())
}
