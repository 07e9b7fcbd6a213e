use crate::domain::model::ExamParameters;
use crate::utils::error::{Result, TimerError};
use crate::utils::validation::validate_non_negative;

pub fn total_standard_time(exam: &ExamParameters) -> f64 {
    exam.total_standard_time()
}

/// Total minutes for a group with `extra_percent` additional time.
///
/// The percentage extends the combined base and reading time. A zero
/// percentage returns the standard total untouched.
pub fn group_total_time(exam: &ExamParameters, extra_percent: f64) -> Result<f64> {
    validate_non_negative("extra_percent", extra_percent)?;
    Ok(extend(exam.total_standard_time(), extra_percent))
}

pub(crate) fn extend(standard_minutes: f64, extra_percent: f64) -> f64 {
    if extra_percent > 0.0 {
        standard_minutes * (1.0 + extra_percent / 100.0)
    } else {
        standard_minutes
    }
}

/// Whole seconds in `minutes`, truncated toward zero.
pub fn minutes_to_seconds(minutes: f64) -> u64 {
    (minutes * 60.0) as u64
}

/// Renders seconds as zero-padded `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parses `H+:MM:SS` back into seconds.
pub fn parse_duration(value: &str) -> Result<u64> {
    let invalid = |reason: &str| TimerError::invalid("duration", value, reason);

    let parts: Vec<&str> = value.trim().split(':').collect();
    let &[hours, minutes, seconds] = parts.as_slice() else {
        return Err(invalid("Expected HH:MM:SS"));
    };

    let field = |part: &str| -> Result<u64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("Expected digits in every field"));
        }
        part.parse::<u64>()
            .map_err(|_| invalid("Field is out of range"))
    };

    let hours = field(hours)?;
    let minutes = field(minutes)?;
    let seconds = field(seconds)?;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("Minutes and seconds must be below 60"));
    }

    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(|| invalid("Duration is too large"))
}
