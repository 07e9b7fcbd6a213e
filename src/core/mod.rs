pub mod clock;
pub mod countdown;
pub mod plan;
pub mod schedule;
pub mod time_model;

pub use crate::domain::model::{
    Announcement, CountdownEvent, CountdownOutcome, CountdownReport, CountdownState,
    DurationOption, ExamParameters, GroupTiming, StudentGroup,
};
pub use crate::domain::ports::{AnnouncementSink, Clock};
pub use crate::utils::error::Result;
