use crate::utils::error::Result;
use crate::utils::validation::validate_non_negative;
use serde::Serialize;
use std::fmt;

/// Base assessment time and reading time, in minutes.
///
/// Both values are validated at construction and cannot change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExamParameters {
    base_minutes: f64,
    reading_minutes: f64,
}

impl ExamParameters {
    pub fn new(base_minutes: f64, reading_minutes: f64) -> Result<Self> {
        validate_non_negative("base_minutes", base_minutes)?;
        validate_non_negative("reading_minutes", reading_minutes)?;
        Ok(Self {
            base_minutes,
            reading_minutes,
        })
    }

    pub fn base_minutes(&self) -> f64 {
        self.base_minutes
    }

    pub fn reading_minutes(&self) -> f64 {
        self.reading_minutes
    }

    /// Standard total: base plus reading time.
    pub fn total_standard_time(&self) -> f64 {
        self.base_minutes + self.reading_minutes
    }
}

/// A number of students sharing the same accommodation percentage.
/// `extra_percent == 0` is the standard group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudentGroup {
    count: u32,
    extra_percent: f64,
}

impl StudentGroup {
    pub fn new(count: u32, extra_percent: f64) -> Result<Self> {
        validate_non_negative("extra_percent", extra_percent)?;
        Ok(Self {
            count,
            extra_percent,
        })
    }

    pub fn standard(count: u32) -> Self {
        Self {
            count,
            extra_percent: 0.0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn extra_percent(&self) -> f64 {
        self.extra_percent
    }

    pub fn is_standard(&self) -> bool {
        self.extra_percent == 0.0
    }

    pub fn label(&self) -> String {
        percent_label(self.extra_percent)
    }
}

pub fn percent_label(extra_percent: f64) -> String {
    if extra_percent > 0.0 {
        format!("{:.0}%", extra_percent)
    } else {
        "Standard".to_string()
    }
}

/// One row of the per-group timing table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTiming {
    pub count: u32,
    pub extra_percent: f64,
    pub label: String,
    pub total_minutes: f64,
    pub formatted: String,
}

/// A distinct total duration a countdown can be started with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationOption {
    pub minutes: f64,
    pub label: String,
    pub formatted: String,
}

impl fmt::Display for DurationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} minutes ({}) ({})",
            self.minutes, self.label, self.formatted
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Started { minutes: u64 },
    MinutesRemaining(u32),
    SecondsRemaining(u64),
    TimeUp,
    Stopped,
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::Started { minutes } => write!(
                f,
                "The assessment has started. You have {} minutes remaining.",
                minutes
            ),
            Announcement::MinutesRemaining(m) => write!(f, "{} minutes remaining.", m),
            Announcement::SecondsRemaining(s) => write!(f, "{} seconds remaining.", s),
            Announcement::TimeUp => write!(f, "Time's up! Please stop writing."),
            Announcement::Stopped => write!(f, "The timer has been stopped."),
        }
    }
}

/// Everything a countdown pushes to its sink, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    Announcement(Announcement),
    Display(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownReport {
    pub outcome: CountdownOutcome,
    pub total_seconds: u64,
    pub ticks: u64,
    pub announcements: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_parameters_reject_negative_values() {
        assert!(ExamParameters::new(-1.0, 0.0).is_err());
        assert!(ExamParameters::new(20.0, -0.5).is_err());
        assert!(ExamParameters::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_total_standard_time() {
        let exam = ExamParameters::new(20.0, 1.0).unwrap();
        assert_eq!(exam.total_standard_time(), 21.0);
    }

    #[test]
    fn test_group_label() {
        assert_eq!(StudentGroup::standard(12).label(), "Standard");
        assert_eq!(StudentGroup::new(3, 25.0).unwrap().label(), "25%");
        assert!(StudentGroup::new(3, -10.0).is_err());
    }

    #[test]
    fn test_announcement_text() {
        assert_eq!(
            Announcement::Started { minutes: 27 }.to_string(),
            "The assessment has started. You have 27 minutes remaining."
        );
        assert_eq!(Announcement::MinutesRemaining(5).to_string(), "5 minutes remaining.");
        assert_eq!(Announcement::SecondsRemaining(30).to_string(), "30 seconds remaining.");
        assert_eq!(Announcement::TimeUp.to_string(), "Time's up! Please stop writing.");
    }

    #[test]
    fn test_duration_option_display() {
        let option = DurationOption {
            minutes: 26.25,
            label: "25%".to_string(),
            formatted: "00:26:15".to_string(),
        };
        assert_eq!(option.to_string(), "26.25 minutes (25%) (00:26:15)");
    }
}
