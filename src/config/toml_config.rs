use crate::config::{DEFAULT_BASE_MINUTES, DEFAULT_READING_MINUTES};
use crate::core::plan::SessionPlan;
use crate::domain::model::{ExamParameters, StudentGroup};
use crate::utils::error::{Result, TimerError};
use crate::utils::validation::{validate_non_negative, validate_positive, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub exam: ExamConfig,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    pub timer: Option<TimerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamConfig {
    pub base_minutes: Option<f64>,
    pub reading_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub count: u32,
    #[serde(default)]
    pub extra_percent: f64,
}

/// Default duration selection for `run`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub percent: Option<f64>,
    pub minutes: Option<f64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${BASE_MINUTES})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| TimerError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_minutes(&self) -> f64 {
        self.exam.base_minutes.unwrap_or(DEFAULT_BASE_MINUTES)
    }

    pub fn reading_minutes(&self) -> f64 {
        self.exam.reading_minutes.unwrap_or(DEFAULT_READING_MINUTES)
    }

    pub fn exam_parameters(&self) -> Result<ExamParameters> {
        ExamParameters::new(self.base_minutes(), self.reading_minutes())
    }

    pub fn student_groups(&self) -> Result<Vec<StudentGroup>> {
        self.groups
            .iter()
            .map(|g| StudentGroup::new(g.count, g.extra_percent))
            .collect()
    }

    /// 依設定建立考試計畫
    pub fn build_plan(&self) -> Result<SessionPlan> {
        let mut plan = SessionPlan::new(self.exam_parameters()?);
        // 依檔案順序加入組別
        for group in self.student_groups()? {
            plan.add_group(group)?;
        }
        Ok(plan)
    }

    /// 驗證設定的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_negative("exam.base_minutes", self.base_minutes())?;
        validate_non_negative("exam.reading_minutes", self.reading_minutes())?;

        for (i, group) in self.groups.iter().enumerate() {
            if group.count == 0 {
                return Err(TimerError::invalid(
                    format!("groups[{}].count", i),
                    group.count,
                    "A group needs at least one student",
                ));
            }
            validate_non_negative(&format!("groups[{}].extra_percent", i), group.extra_percent)?;
        }

        if let Some(timer) = &self.timer {
            if let Some(percent) = timer.percent {
                validate_non_negative("timer.percent", percent)?;
            }
            if let Some(minutes) = timer.minutes {
                validate_positive("timer.minutes", minutes)?;
            }
            if timer.percent.is_some() && timer.minutes.is_some() {
                return Err(TimerError::config(
                    "[timer] accepts either `percent` or `minutes`, not both",
                ));
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
