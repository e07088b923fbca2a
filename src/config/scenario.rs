use crate::domain::model::DEFAULT_CHANNELS;
use crate::domain::ports::ScenarioProvider;
use crate::utils::error::{AllocError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_amount,
    validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A scripted allocation scenario, the non-interactive counterpart of the
/// CLI flags. One file describes one run: which model, what budget, which
/// bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlScenario {
    pub scenario: ScenarioMeta,
    pub model: ModelSection,
    pub budget: BudgetSection,
    pub channels: Option<ChannelsSection>,
    #[serde(default)]
    pub bounds: BTreeMap<String, BoundSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSection {
    pub total: f64,
    pub time_period_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsSection {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundSection {
    pub min: f64,
    pub max: f64,
}

impl TomlScenario {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AllocError::ConfigError {
            message: format!("cannot read scenario file {}: {}", path.display(), e),
        })?;
        let mut scenario: TomlScenario = toml::from_str(&content)?;

        // Channel set defaults to the four channels the bundled model covers.
        if scenario.channels.is_none() {
            scenario.channels = Some(ChannelsSection {
                names: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            });
        }

        Ok(scenario)
    }

    pub fn channel_names(&self) -> &[String] {
        self.channels
            .as_ref()
            .map(|c| c.names.as_slice())
            .unwrap_or(&[])
    }
}

impl Validate for TomlScenario {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scenario.name", &self.scenario.name)?;
        validate_path("model.path", &self.model.path)?;
        validate_file_extension("model.path", &self.model.path, "json")?;
        validate_positive_amount("budget.total", self.budget.total, 100.0)?;
        validate_positive_number(
            "budget.time_period_days",
            self.budget.time_period_days as usize,
            1,
        )?;

        let names = self.channel_names();
        if names.is_empty() {
            return Err(AllocError::MissingConfigError {
                field: "channels.names".to_string(),
            });
        }
        for channel in names {
            validate_non_empty_string("channels.names", channel)?;
        }

        Ok(())
    }
}

impl ScenarioProvider for TomlScenario {
    fn model_path(&self) -> &str {
        &self.model.path
    }

    fn total_budget(&self) -> f64 {
        self.budget.total
    }

    fn time_period(&self) -> u32 {
        self.budget.time_period_days
    }

    fn channels(&self) -> &[String] {
        self.channel_names()
    }

    fn bounds(&self) -> Result<BTreeMap<String, (f64, f64)>> {
        let mut bounds: BTreeMap<String, (f64, f64)> = self
            .bounds
            .iter()
            .map(|(channel, b)| (channel.clone(), (b.min, b.max)))
            .collect();
        for channel in self.channel_names() {
            bounds
                .entry(channel.clone())
                .or_insert((0.0, self.budget.total));
        }
        Ok(bounds)
    }
}
