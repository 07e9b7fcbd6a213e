pub mod cli;
pub mod toml_config;

use crate::core::plan::SessionPlan;
use crate::utils::error::{Result, TimerError};
use toml_config::{TimerConfig, TomlConfig};

#[cfg(feature = "cli")]
use crate::core::time_model::parse_duration;
#[cfg(feature = "cli")]
use crate::domain::model::StudentGroup;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_negative, validate_positive, Validate};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_BASE_MINUTES: f64 = 20.0;
pub const DEFAULT_READING_MINUTES: f64 = 1.0;

/// A plan plus the default duration selection carried by a session file.
#[derive(Debug, Clone)]
pub struct Session {
    pub plan: SessionPlan,
    pub timer: Option<TimerConfig>,
}

impl Session {
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        Ok(Self {
            plan: config.build_plan()?,
            timer: config.timer.clone(),
        })
    }

    /// Falls back to the session file's `[timer]` section, then to the only
    /// distinct duration if there is exactly one.
    pub fn default_minutes(&self) -> Result<f64> {
        if let Some(timer) = &self.timer {
            if let Some(minutes) = timer.minutes {
                return Ok(minutes);
            }
            if let Some(percent) = timer.percent {
                return self.plan.duration_for_percent(percent);
            }
        }

        let options = self.plan.duration_options();
        match options.as_slice() {
            [only] => Ok(only.minutes),
            [] => Err(TimerError::config(
                "No duration to run: add a group or pass --minutes",
            )),
            _ => Err(TimerError::config(format!(
                "{} distinct durations available; choose one with --option 1..{}",
                options.len(),
                options.len()
            ))),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "exam-timer")]
#[command(about = "Plan and run timed practical assessments")]
pub struct CliConfig {
    /// Path to a TOML session file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base assessment time in minutes [default: 20]
    #[arg(long, allow_negative_numbers = true)]
    pub base: Option<f64>,

    /// Reading time in minutes [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub reading: Option<f64>,

    /// Number of students with standard time
    #[arg(long = "standard", value_name = "COUNT")]
    pub standard_count: Option<u32>,

    /// Group with additional time, e.g. `3:25` for 3 students with 25% extra
    #[arg(long = "group", value_name = "COUNT:PERCENT", value_parser = parse_group)]
    pub groups: Vec<StudentGroup>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the time allotted to each group and the distinct durations
    Plan {
        #[arg(long)]
        json: bool,
    },
    /// Run the countdown for one duration
    Run(RunArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Duration in minutes
    #[arg(long, conflicts_with_all = ["clock", "percent", "option"])]
    pub minutes: Option<f64>,

    /// Duration as HH:MM:SS
    #[arg(long, conflicts_with_all = ["percent", "option"])]
    pub clock: Option<String>,

    /// Duration of a group with this additional percentage
    #[arg(long, conflicts_with = "option")]
    pub percent: Option<f64>,

    /// Entry of the plan's duration list, counting from 1
    #[arg(long)]
    pub option: Option<usize>,
}

#[cfg(feature = "cli")]
fn parse_group(value: &str) -> std::result::Result<StudentGroup, String> {
    let (count, percent) = value
        .split_once(':')
        .ok_or_else(|| format!("expected COUNT:PERCENT, got '{}'", value))?;
    let count: u32 = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid student count '{}': {}", count, e))?;
    let percent: f64 = percent
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|e| format!("invalid percentage '{}': {}", percent, e))?;
    StudentGroup::new(count, percent).map_err(|e| e.to_string())
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn load_session(&self) -> Result<Session> {
        // 載入 TOML 設定檔 (未指定時使用預設值)
        let mut file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading session from: {}", path.display());
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => TomlConfig::default(),
        };

        // 應用命令列覆蓋設定
        if let Some(base) = self.base {
            file.exam.base_minutes = Some(base);
            tracing::debug!("🔧 Base time overridden to: {}", base);
        }
        if let Some(reading) = self.reading {
            file.exam.reading_minutes = Some(reading);
            tracing::debug!("🔧 Reading time overridden to: {}", reading);
        }

        let mut session = Session::from_toml(&file)?;

        // 命令列的組別接在設定檔組別之後
        if let Some(count) = self.standard_count {
            if !session.plan.add_standard_group(count)? {
                tracing::warn!("Standard group already defined, ignoring --standard {}", count);
            }
        }
        for group in &self.groups {
            session.plan.add_group(*group)?;
        }

        Ok(session)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base) = self.base {
            validate_non_negative("base", base)?;
        }
        if let Some(reading) = self.reading {
            validate_non_negative("reading", reading)?;
        }
        if let Command::Run(run) = &self.command {
            run.validate()?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl Validate for RunArgs {
    fn validate(&self) -> Result<()> {
        if let Some(minutes) = self.minutes {
            validate_positive("minutes", minutes)?;
        }
        if let Some(percent) = self.percent {
            validate_non_negative("percent", percent)?;
        }
        if let Some(clock) = &self.clock {
            parse_duration(clock)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl RunArgs {
    /// Resolves the countdown length in minutes.
    pub fn resolve_minutes(&self, session: &Session) -> Result<f64> {
        if let Some(minutes) = self.minutes {
            return Ok(minutes);
        }
        if let Some(clock) = &self.clock {
            return Ok(parse_duration(clock)? as f64 / 60.0);
        }
        if let Some(percent) = self.percent {
            return session.plan.duration_for_percent(percent);
        }
        if let Some(index) = self.option {
            return Ok(session.plan.option(index)?.minutes);
        }
        session.default_minutes()
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("exam-timer").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_parse_group() {
        let group = parse_group("3:25").unwrap();
        assert_eq!(group.count(), 3);
        assert_eq!(group.extra_percent(), 25.0);
        assert_eq!(parse_group("2:50%").unwrap().extra_percent(), 50.0);
        assert!(parse_group("3").is_err());
        assert!(parse_group("x:25").is_err());
        assert!(parse_group("3:-5").is_err());
    }

    #[test]
    fn test_session_from_arguments() {
        let config = parse(&["--standard", "20", "--group", "3:25", "plan"]);
        let session = config.load_session().unwrap();

        assert_eq!(session.plan.exam().total_standard_time(), 21.0);
        assert_eq!(session.plan.groups().len(), 2);
        assert!(session.timer.is_none());
    }

    #[test]
    fn test_resolve_by_option_and_percent() {
        let config = parse(&["--standard", "20", "--group", "3:25", "run", "--option", "2"]);
        let session = config.load_session().unwrap();
        let Command::Run(run) = &config.command else {
            panic!("expected run command");
        };
        assert_eq!(run.resolve_minutes(&session).unwrap(), 26.25);

        let by_percent = RunArgs {
            percent: Some(50.0),
            ..RunArgs::default()
        };
        assert_eq!(by_percent.resolve_minutes(&session).unwrap(), 31.5);
    }

    #[test]
    fn test_resolve_by_clock() {
        let config = parse(&["run", "--clock", "00:26:15"]);
        let session = config.load_session().unwrap();
        let Command::Run(run) = &config.command else {
            panic!("expected run command");
        };
        assert_eq!(run.resolve_minutes(&session).unwrap(), 26.25);
    }

    #[test]
    fn test_ambiguous_selection_is_config_error() {
        let config = parse(&["--standard", "20", "--group", "3:25", "run"]);
        let session = config.load_session().unwrap();
        let Command::Run(run) = &config.command else {
            panic!("expected run command");
        };
        let err = run.resolve_minutes(&session).unwrap_err();
        assert!(matches!(err, TimerError::ConfigError { .. }));
    }

    #[test]
    fn test_session_file_timer_section() {
        let config = TomlConfig::from_toml_str(
            "[[groups]]\ncount = 20\n\n[[groups]]\ncount = 3\nextra_percent = 25.0\n\n[timer]\npercent = 25.0\n",
        )
        .unwrap();
        let session = Session::from_toml(&config).unwrap();
        assert_eq!(session.default_minutes().unwrap(), 26.25);
    }

    #[test]
    fn test_session_file_timer_minutes() {
        let config = TomlConfig::from_toml_str(
            "[[groups]]\ncount = 20\n\n[[groups]]\ncount = 3\nextra_percent = 25.0\n\n[timer]\nminutes = 12.5\n",
        )
        .unwrap();
        let session = Session::from_toml(&config).unwrap();
        assert_eq!(session.default_minutes().unwrap(), 12.5);
    }

    #[test]
    fn test_single_duration_is_default() {
        let config = TomlConfig::from_toml_str(
            "[[groups]]\ncount = 20\n\n[[groups]]\ncount = 4\nextra_percent = 0.0\n",
        )
        .unwrap();
        let session = Session::from_toml(&config).unwrap();
        assert_eq!(session.plan.groups().len(), 2);
        assert_eq!(session.default_minutes().unwrap(), 21.0);
    }

    #[test]
    fn test_no_groups_without_timer_is_config_error() {
        let session = Session::from_toml(&TomlConfig::default()).unwrap();
        let err = session.default_minutes().unwrap_err();
        assert!(matches!(err, TimerError::ConfigError { .. }));
    }

    #[test]
    fn test_arguments_override_session_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[exam]\nbase_minutes = 40.0\nreading_minutes = 5.0\n\n[[groups]]\ncount = 10\n")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", path.as_str(), "--reading", "0", "--group", "2:50", "plan"]);
        let session = config.load_session().unwrap();

        assert_eq!(session.plan.exam().total_standard_time(), 40.0);
        let minutes: Vec<f64> = session
            .plan
            .duration_options()
            .iter()
            .map(|o| o.minutes)
            .collect();
        assert_eq!(minutes, vec![40.0, 60.0]);
    }

    #[test]
    fn test_conflicting_run_flags_rejected() {
        let result = CliConfig::try_parse_from(["exam-timer", "run", "--minutes", "5", "--option", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_negative_base() {
        let config = parse(&["--base", "-5", "plan"]);
        assert!(config.validate().is_err());
    }
}
