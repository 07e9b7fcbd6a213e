use crate::utils::error::{Result, TimerError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts any finite value `>= 0`.
pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TimerError::invalid(field_name, value, "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(TimerError::invalid(field_name, value, "Value cannot be negative"));
    }
    Ok(())
}

/// Accepts any finite value `> 0`.
pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TimerError::invalid(field_name, value, "Value must be a finite number"));
    }
    if value <= 0.0 {
        return Err(TimerError::invalid(field_name, value, "Value must be greater than zero"));
    }
    Ok(())
}

pub fn validate_at_most(field_name: &str, value: f64, max: f64) -> Result<()> {
    if value > max {
        return Err(TimerError::invalid(
            field_name,
            value,
            format!("Value must be at most {}", max),
        ));
    }
    Ok(())
}

pub fn validate_positive_count(field_name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(TimerError::invalid(field_name, value, "Value must be at least 1"));
    }
    Ok(())
}

pub fn validate_one_based_index(field_name: &str, value: usize, len: usize) -> Result<()> {
    if value == 0 || value > len {
        let reason = if len == 0 {
            "No options are available".to_string()
        } else {
            format!("Value must be between 1 and {}", len)
        };
        return Err(TimerError::invalid(field_name, value, reason));
    }
    Ok(())
}
