use crate::core::time_model::{extend, format_duration, group_total_time, minutes_to_seconds};
use crate::domain::model::{DurationOption, ExamParameters, GroupTiming, StudentGroup};
use crate::utils::error::Result;
use crate::utils::validation::{validate_one_based_index, validate_positive_count};
use serde::Serialize;

#[derive(Serialize)]
struct PlanReport<'a> {
    exam: &'a ExamParameters,
    standard_minutes: f64,
    groups: Vec<GroupTiming>,
    options: Vec<DurationOption>,
}

/// An exam together with the student groups sitting it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    exam: ExamParameters,
    groups: Vec<StudentGroup>,
}

impl SessionPlan {
    pub fn new(exam: ExamParameters) -> Self {
        Self {
            exam,
            groups: Vec::new(),
        }
    }

    pub fn exam(&self) -> &ExamParameters {
        &self.exam
    }

    pub fn groups(&self) -> &[StudentGroup] {
        &self.groups
    }

    pub fn add_group(&mut self, group: StudentGroup) -> Result<()> {
        validate_positive_count("count", group.count())?;
        tracing::debug!(
            "Adding group: {} students ({})",
            group.count(),
            group.label()
        );
        self.groups.push(group);
        Ok(())
    }

    /// Adds the standard group unless one is already present.
    pub fn add_standard_group(&mut self, count: u32) -> Result<bool> {
        if self.groups.iter().any(StudentGroup::is_standard) {
            return Ok(false);
        }
        self.add_group(StudentGroup::standard(count))?;
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn timings(&self) -> Vec<GroupTiming> {
        let standard = self.exam.total_standard_time();
        self.groups
            .iter()
            .map(|group| {
                let total_minutes = extend(standard, group.extra_percent());
                GroupTiming {
                    count: group.count(),
                    extra_percent: group.extra_percent(),
                    label: group.label(),
                    total_minutes,
                    formatted: format_duration(minutes_to_seconds(total_minutes)),
                }
            })
            .collect()
    }

    /// Distinct group durations, shortest first. A duration shared by
    /// several groups keeps the label of the first one.
    pub fn duration_options(&self) -> Vec<DurationOption> {
        let mut options: Vec<DurationOption> = Vec::new();
        for timing in self.timings() {
            if options.iter().any(|o| o.minutes == timing.total_minutes) {
                continue;
            }
            options.push(DurationOption {
                minutes: timing.total_minutes,
                label: timing.label,
                formatted: timing.formatted,
            });
        }
        options.sort_by(|a, b| a.minutes.total_cmp(&b.minutes));
        options
    }

    /// Picks an entry of [`duration_options`](Self::duration_options), counting from 1.
    pub fn option(&self, index: usize) -> Result<DurationOption> {
        let mut options = self.duration_options();
        validate_one_based_index("option", index, options.len())?;
        Ok(options.swap_remove(index - 1))
    }

    pub fn duration_for_percent(&self, extra_percent: f64) -> Result<f64> {
        group_total_time(&self.exam, extra_percent)
    }

    /// Exam, group table and duration options as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let report = PlanReport {
            exam: &self.exam,
            standard_minutes: self.exam.total_standard_time(),
            groups: self.timings(),
            options: self.duration_options(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}
