use crate::core::time_model::minutes_to_seconds;
use std::collections::BTreeSet;

/// Minute marks always announced when they fall inside the run.
pub const KEY_MINUTE_MARKS: [u32; 10] = [60, 30, 20, 15, 10, 5, 4, 3, 2, 1];

/// Reminder marks added when they do not exceed the duration.
pub const REMINDER_MINUTE_MARKS: [u32; 10] = [30, 25, 20, 15, 10, 5, 4, 3, 2, 1];

pub const SECOND_MARKS: [u64; 3] = [30, 10, 5];

/// Checkpoints for one countdown run.
#[derive(Debug, Clone)]
pub struct AnnouncementSchedule {
    total_seconds: u64,
    minute_marks: Vec<u32>,
    next_minute: usize,
    pending_seconds: BTreeSet<u64>,
}

impl AnnouncementSchedule {
    pub fn new(duration_minutes: f64) -> Self {
        let mut marks = BTreeSet::new();

        let ceiling = duration_minutes.ceil().clamp(0.0, f64::from(u32::MAX)) as u32;
        marks.extend((1..=ceiling / 10).map(|k| k * 10));
        marks.extend(KEY_MINUTE_MARKS.into_iter().filter(|&m| m <= ceiling));

        for m in REMINDER_MINUTE_MARKS {
            if f64::from(m) <= duration_minutes {
                marks.insert(m);
            }
        }

        Self {
            total_seconds: minutes_to_seconds(duration_minutes),
            minute_marks: marks.into_iter().rev().filter(|&m| m > 0).collect(),
            next_minute: 0,
            pending_seconds: SECOND_MARKS.into_iter().collect(),
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// All minute marks, descending, including consumed ones.
    pub fn minute_marks(&self) -> &[u32] {
        &self.minute_marks
    }

    pub fn next_minute_mark(&self) -> Option<u32> {
        self.minute_marks.get(self.next_minute).copied()
    }

    pub fn consume_minute_mark(&mut self) {
        if self.next_minute < self.minute_marks.len() {
            self.next_minute += 1;
        }
    }

    /// Removes `remaining_seconds` from the pending second marks.
    /// Returns `true` only the first time a mark is taken.
    pub fn take_second_mark(&mut self, remaining_seconds: u64) -> bool {
        self.pending_seconds.remove(&remaining_seconds)
    }
}
