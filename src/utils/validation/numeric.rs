//! Numeric validation utilities
//!
//! Range checks for user-supplied numbers such as the slider position.

use crate::error::{ClientError, Result};

/// Validator for numeric inputs
pub struct NumericValidator;

impl NumericValidator {
    /// Validate a slider position (0-100)
    pub fn validate_slider_position(value: i64) -> Result<u8> {
        if !(0..=100).contains(&value) {
            return Err(ClientError::config_value_error(
                "slider position",
                value,
                "0-100",
            ));
        }
        Ok(value as u8)
    }

    /// Validate a positive byte limit
    pub fn validate_byte_limit(value: u64) -> Result<u64> {
        if value == 0 {
            return Err(ClientError::config_value_error(
                "upload limit",
                value,
                "1 or more bytes",
            ));
        }
        Ok(value)
    }
}
