pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Command, CliConfig, RunArgs};

pub use config::{cli::ConsoleSink, toml_config::TomlConfig, Session};
pub use self::core::{
    clock::{ManualClock, StopHandle, SystemClock},
    countdown::{Countdown, RunningCountdown},
    plan::SessionPlan,
    schedule::AnnouncementSchedule,
    time_model::{
        format_duration, group_total_time, minutes_to_seconds, parse_duration,
        total_standard_time,
    },
};
pub use domain::model::{
    Announcement, CountdownEvent, CountdownOutcome, CountdownReport, CountdownState,
    DurationOption, ExamParameters, GroupTiming, StudentGroup,
};
pub use domain::ports::{AnnouncementSink, Clock};
pub use utils::error::{Result, TimerError};
