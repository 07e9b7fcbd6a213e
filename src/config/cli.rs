use crate::domain::model::Announcement;
use crate::domain::ports::AnnouncementSink;
use std::io::{self, Stdout, Write};

/// Terminal sink: the remaining time is redrawn in place, announcements
/// are printed on their own line.
#[derive(Debug)]
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
    display_pending: bool,
}

impl ConsoleSink<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            display_pending: false,
        }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> AnnouncementSink for ConsoleSink<W> {
    fn announce(&mut self, announcement: &Announcement) {
        if self.display_pending {
            self.write("\n");
            self.display_pending = false;
        }
        self.write(&format!("📢 ANNOUNCEMENT: {}\n", announcement));
    }

    fn display(&mut self, remaining: &str) {
        self.write(&format!("\r⏳ Remaining Time: {}", remaining));
        self.display_pending = true;
    }
}

impl<W: Write> Drop for ConsoleSink<W> {
    fn drop(&mut self) {
        if self.display_pending {
            self.write("\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_breaks_display_line() {
        let mut buffer = Vec::new();
        {
            let mut sink = ConsoleSink::with_writer(&mut buffer);
            sink.display("00:00:06");
            sink.announce(&Announcement::SecondsRemaining(5));
            sink.display("00:00:05");
        }

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "\r⏳ Remaining Time: 00:00:06\n📢 ANNOUNCEMENT: 5 seconds remaining.\n\r⏳ Remaining Time: 00:00:05\n"
        );
    }
}
