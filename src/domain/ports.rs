use crate::domain::model::{Announcement, CountdownEvent};
use std::time::{Duration, Instant};

/// Time source for the countdown loop.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Receives what a countdown emits: one-shot announcements and the
/// remaining-time display (`HH:MM:SS`) once per tick.
pub trait AnnouncementSink {
    fn announce(&mut self, announcement: &Announcement);
    fn display(&mut self, remaining: &str);
}

impl AnnouncementSink for Vec<CountdownEvent> {
    fn announce(&mut self, announcement: &Announcement) {
        self.push(CountdownEvent::Announcement(*announcement));
    }

    fn display(&mut self, remaining: &str) {
        self.push(CountdownEvent::Display(remaining.to_string()));
    }
}

impl<S: AnnouncementSink + ?Sized> AnnouncementSink for &mut S {
    fn announce(&mut self, announcement: &Announcement) {
        (**self).announce(announcement);
    }

    fn display(&mut self, remaining: &str) {
        (**self).display(remaining);
    }
}
