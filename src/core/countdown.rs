use crate::core::clock::StopHandle;
use crate::core::schedule::AnnouncementSchedule;
use crate::core::time_model::format_duration;
use crate::domain::model::{Announcement, CountdownOutcome, CountdownReport, CountdownState};
use crate::domain::ports::{AnnouncementSink, Clock};
use crate::utils::error::Result;
use crate::utils::validation::{validate_at_most, validate_positive};
use std::time::Duration;

/// Longest accepted run, about two years.
pub const MAX_DURATION_MINUTES: f64 = 1_000_000.0;

/// A countdown that has not been started yet.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    duration_minutes: f64,
}

impl Countdown {
    pub fn new(duration_minutes: f64) -> Result<Self> {
        validate_positive("duration_minutes", duration_minutes)?;
        validate_at_most("duration_minutes", duration_minutes, MAX_DURATION_MINUTES)?;
        Ok(Self { duration_minutes })
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    pub fn state(&self) -> CountdownState {
        CountdownState::Idle
    }

    /// Builds the schedule and emits the start announcement.
    pub fn start<S: AnnouncementSink + ?Sized>(self, sink: &mut S) -> RunningCountdown {
        let schedule = AnnouncementSchedule::new(self.duration_minutes);
        tracing::info!(
            "⏱️ Countdown started: {:.2} minutes ({})",
            self.duration_minutes,
            format_duration(schedule.total_seconds())
        );
        tracing::debug!("Minute marks: {:?}", schedule.minute_marks());

        let mut running = RunningCountdown {
            schedule,
            last_announced_minute: None,
            outcome: None,
            ticks: 0,
            announcements: 0,
        };
        running.announce(
            sink,
            Announcement::Started {
                minutes: self.duration_minutes.ceil() as u64,
            },
        );
        running
    }

    /// Runs the countdown on the calling thread until time is up or `stop`
    /// is triggered. One tick per whole elapsed second.
    pub fn run<C, S>(self, clock: &C, sink: &mut S, stop: &StopHandle) -> CountdownReport
    where
        C: Clock + ?Sized,
        S: AnnouncementSink + ?Sized,
    {
        let start = clock.now();
        let mut running = self.start(sink);

        let outcome = loop {
            // 檢查停止請求
            if stop.is_stopped() {
                running.stop(sink);
                break CountdownOutcome::Cancelled;
            }

            let elapsed = clock.now().saturating_duration_since(start).as_secs();
            if running.tick(elapsed, sink) == CountdownState::Finished {
                break CountdownOutcome::Completed;
            }

            // 睡到下一個整秒
            let next_boundary = start + Duration::from_secs(elapsed + 1);
            clock.sleep(next_boundary.saturating_duration_since(clock.now()));
        };

        let report = running.report(outcome);
        tracing::info!(
            "🏁 Countdown finished: {:?} after {} ticks, {} announcements",
            report.outcome,
            report.ticks,
            report.announcements
        );
        report
    }
}

/// A countdown between its start announcement and `Finished`.
#[derive(Debug, Clone)]
pub struct RunningCountdown {
    schedule: AnnouncementSchedule,
    last_announced_minute: Option<u64>,
    outcome: Option<CountdownOutcome>,
    ticks: u64,
    announcements: usize,
}

impl RunningCountdown {
    pub fn state(&self) -> CountdownState {
        if self.outcome.is_some() {
            CountdownState::Finished
        } else {
            CountdownState::Running
        }
    }

    pub fn outcome(&self) -> Option<CountdownOutcome> {
        self.outcome
    }

    pub fn schedule(&self) -> &AnnouncementSchedule {
        &self.schedule
    }

    /// Evaluates the schedule at `elapsed_seconds` since start.
    /// Does nothing once finished.
    pub fn tick<S: AnnouncementSink + ?Sized>(
        &mut self,
        elapsed_seconds: u64,
        sink: &mut S,
    ) -> CountdownState {
        if self.outcome.is_some() {
            return CountdownState::Finished;
        }
        self.ticks += 1;

        // 更新剩餘時間顯示
        let remaining = self.schedule.total_seconds().saturating_sub(elapsed_seconds);
        sink.display(&format_duration(remaining));

        if remaining == 0 {
            self.announce(sink, Announcement::TimeUp);
            self.outcome = Some(CountdownOutcome::Completed);
            return CountdownState::Finished;
        }

        // 分鐘提醒: 同一個剩餘分鐘只播報一次
        let remaining_minutes = remaining.div_ceil(60);

        if let Some(mark) = self.schedule.next_minute_mark() {
            if remaining_minutes <= u64::from(mark)
                && self.last_announced_minute != Some(remaining_minutes)
            {
                self.announce(sink, Announcement::MinutesRemaining(mark));
                self.last_announced_minute = Some(remaining_minutes);
                self.schedule.consume_minute_mark();
            }
        }

        // 秒數提醒
        if self.schedule.take_second_mark(remaining) {
            self.announce(sink, Announcement::SecondsRemaining(remaining));
        }

        CountdownState::Running
    }

    /// Cancels a running countdown. Has no effect once finished.
    pub fn stop<S: AnnouncementSink + ?Sized>(&mut self, sink: &mut S) -> CountdownState {
        if self.outcome.is_none() {
            tracing::warn!("🛑 Countdown stopped before time was up");
            self.announce(sink, Announcement::Stopped);
            self.outcome = Some(CountdownOutcome::Cancelled);
        }
        CountdownState::Finished
    }

    fn announce<S: AnnouncementSink + ?Sized>(&mut self, sink: &mut S, announcement: Announcement) {
        tracing::debug!("📢 {}", announcement);
        sink.announce(&announcement);
        self.announcements += 1;
    }

    fn report(&self, outcome: CountdownOutcome) -> CountdownReport {
        CountdownReport {
            outcome,
            total_seconds: self.schedule.total_seconds(),
            ticks: self.ticks,
            announcements: self.announcements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::domain::model::CountdownEvent;

    fn announcements(events: &[CountdownEvent]) -> Vec<Announcement> {
        events
            .iter()
            .filter_map(|e| match e {
                CountdownEvent::Announcement(a) => Some(*a),
                CountdownEvent::Display(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        assert!(Countdown::new(0.0).is_err());
        assert!(Countdown::new(-2.5).is_err());
        assert!(Countdown::new(f64::NAN).is_err());
        assert_eq!(Countdown::new(0.5).unwrap().state(), CountdownState::Idle);
    }

    #[test]
    fn test_rejects_duration_above_maximum() {
        assert!(Countdown::new(MAX_DURATION_MINUTES).is_ok());
        assert!(Countdown::new(MAX_DURATION_MINUTES + 1.0).is_err());
        assert!(Countdown::new(1.0e18).is_err());
    }

    #[test]
    fn test_longest_run_does_not_end_at_once() {
        let mut events: Vec<CountdownEvent> = Vec::new();
        let mut running = Countdown::new(MAX_DURATION_MINUTES).unwrap().start(&mut events);

        assert_eq!(running.schedule().total_seconds(), 60_000_000);
        assert_eq!(running.tick(0, &mut events), CountdownState::Running);
        assert_eq!(
            events.last(),
            Some(&CountdownEvent::Announcement(Announcement::MinutesRemaining(1_000_000)))
        );
        assert!(!announcements(&events).contains(&Announcement::TimeUp));
    }

    #[test]
    fn test_elapsed_past_total_finishes() {
        let mut events: Vec<CountdownEvent> = Vec::new();
        let mut running = Countdown::new(0.1).unwrap().start(&mut events);
        assert_eq!(running.tick(u64::MAX, &mut events), CountdownState::Finished);
        assert_eq!(
            events.last(),
            Some(&CountdownEvent::Announcement(Announcement::TimeUp))
        );
    }

    #[test]
    fn test_six_second_run() {
        let clock = ManualClock::new();
        let mut events: Vec<CountdownEvent> = Vec::new();
        let report = Countdown::new(0.1)
            .unwrap()
            .run(&clock, &mut events, &StopHandle::new());

        assert_eq!(
            announcements(&events),
            vec![
                Announcement::Started { minutes: 1 },
                Announcement::MinutesRemaining(1),
                Announcement::SecondsRemaining(5),
                Announcement::TimeUp,
            ]
        );
        assert_eq!(report.outcome, CountdownOutcome::Completed);
        assert_eq!(report.ticks, 7);
        assert_eq!(report.announcements, 4);
        assert_eq!(clock.elapsed(), Duration::from_secs(6));
        assert_eq!(
            events.last(),
            Some(&CountdownEvent::Announcement(Announcement::TimeUp))
        );
    }

    #[test]
    fn test_display_counts_down_to_zero() {
        let clock = ManualClock::new();
        let mut events: Vec<CountdownEvent> = Vec::new();
        Countdown::new(0.05)
            .unwrap()
            .run(&clock, &mut events, &StopHandle::new());

        let displays: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                CountdownEvent::Display(d) => Some(d.as_str()),
                CountdownEvent::Announcement(_) => None,
            })
            .collect();
        assert_eq!(displays, vec!["00:00:03", "00:00:02", "00:00:01", "00:00:00"]);
    }

    #[test]
    fn test_no_events_after_finished() {
        let mut events: Vec<CountdownEvent> = Vec::new();
        let mut running = Countdown::new(0.1).unwrap().start(&mut events);
        assert_eq!(running.tick(10, &mut events), CountdownState::Finished);
        let emitted = events.len();

        assert_eq!(running.tick(11, &mut events), CountdownState::Finished);
        assert_eq!(running.stop(&mut events), CountdownState::Finished);
        assert_eq!(events.len(), emitted);
        assert_eq!(running.outcome(), Some(CountdownOutcome::Completed));
    }

    #[test]
    fn test_minute_mark_waits_for_a_new_minute() {
        let mut events: Vec<CountdownEvent> = Vec::new();
        let mut running = Countdown::new(10.0).unwrap().start(&mut events);

        running.tick(0, &mut events);
        // 剩 239 秒: 補播 5 分鐘提醒
        running.tick(361, &mut events);
        // 仍在同一個剩餘分鐘內, 4 分鐘提醒延後
        running.tick(362, &mut events);
        running.tick(421, &mut events);

        assert_eq!(
            announcements(&events),
            vec![
                Announcement::Started { minutes: 10 },
                Announcement::MinutesRemaining(10),
                Announcement::MinutesRemaining(5),
                Announcement::MinutesRemaining(4),
            ]
        );
    }

    #[test]
    fn test_stop_before_first_tick() {
        let clock = ManualClock::new();
        let stop = StopHandle::new();
        stop.stop();

        let mut events: Vec<CountdownEvent> = Vec::new();
        let report = Countdown::new(5.0).unwrap().run(&clock, &mut events, &stop);

        assert_eq!(report.outcome, CountdownOutcome::Cancelled);
        assert_eq!(report.ticks, 0);
        assert_eq!(
            announcements(&events),
            vec![Announcement::Started { minutes: 5 }, Announcement::Stopped]
        );
    }
}
