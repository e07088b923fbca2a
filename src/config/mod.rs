pub mod scenario;

use crate::domain::ports::ScenarioProvider;
use crate::utils::error::{AllocError, Result};
use crate::utils::validation::{
    self, validate_file_extension, validate_non_empty_string, validate_path,
    validate_positive_amount, validate_positive_number, validate_range,
};
use clap::Parser;
use std::collections::BTreeMap;

const DEFAULT_CHANNEL_LIST: &str = "google_ads_c,facebook_ads_c,amazon_ads_c,microsoft_ads_c";

#[derive(Debug, Clone, Parser)]
#[command(name = "budget-allocator")]
#[command(about = "Predicts optimal budget allocations across marketing channels from a pre-fitted model")]
pub struct CliConfig {
    /// Path to the pre-trained model artifact (JSON)
    #[arg(long, default_value = "./model.json")]
    pub model_path: String,

    /// Total budget (£), minimum 100
    #[arg(long, default_value = "50000")]
    pub total_budget: f64,

    /// Time period in days, minimum 1
    #[arg(long, default_value = "90")]
    pub time_period: u32,

    /// Per-channel bounds as channel=min:max, comma separated.
    /// Channels without an explicit bound default to 0:total_budget.
    #[arg(long, value_delimiter = ',')]
    pub bounds: Vec<String>,

    /// Channel set the model was fitted on
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_CHANNEL_LIST)]
    pub channels: Vec<String>,

    /// Plot response curves instead of predicting an allocation
    #[arg(long)]
    pub curves: bool,

    /// Number of sample points per response curve
    #[arg(long, default_value = "20")]
    pub curve_samples: usize,

    /// Enable verbose output
    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parse one `channel=min:max` bound specification.
pub fn parse_bound_spec(spec: &str) -> Result<(String, (f64, f64))> {
    let invalid = |reason: String| AllocError::InvalidConfigValueError {
        field: "bounds".to_string(),
        value: spec.to_string(),
        reason,
    };

    let (channel, range) = spec
        .split_once('=')
        .ok_or_else(|| invalid("expected channel=min:max".to_string()))?;
    let (min, max) = range
        .split_once(':')
        .ok_or_else(|| invalid("expected channel=min:max".to_string()))?;

    let channel = channel.trim();
    if channel.is_empty() {
        return Err(invalid("channel name cannot be empty".to_string()));
    }
    let min: f64 = min
        .trim()
        .parse()
        .map_err(|e| invalid(format!("minimum is not a number: {}", e)))?;
    let max: f64 = max
        .trim()
        .parse()
        .map_err(|e| invalid(format!("maximum is not a number: {}", e)))?;

    Ok((channel.to_string(), (min, max)))
}

impl validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("model_path", &self.model_path)?;
        validate_file_extension("model_path", &self.model_path, "json")?;
        validate_positive_amount("total_budget", self.total_budget, 100.0)?;
        validate_positive_number("time_period", self.time_period as usize, 1)?;
        validate_range("curve_samples", self.curve_samples, 2, 200)?;

        if self.channels.is_empty() {
            return Err(AllocError::MissingConfigError {
                field: "channels".to_string(),
            });
        }
        for channel in &self.channels {
            validate_non_empty_string("channels", channel)?;
        }

        for spec in &self.bounds {
            parse_bound_spec(spec)?;
        }

        Ok(())
    }
}

impl ScenarioProvider for CliConfig {
    fn model_path(&self) -> &str {
        &self.model_path
    }

    fn total_budget(&self) -> f64 {
        self.total_budget
    }

    fn time_period(&self) -> u32 {
        self.time_period
    }

    fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Explicit `--bounds` entries, with the form defaults (0 to the total
    /// budget) filled in for every channel left unspecified.
    fn bounds(&self) -> Result<BTreeMap<String, (f64, f64)>> {
        let mut bounds: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for spec in &self.bounds {
            let (channel, pair) = parse_bound_spec(spec)?;
            bounds.insert(channel, pair);
        }
        for channel in &self.channels {
            bounds
                .entry(channel.clone())
                .or_insert((0.0, self.total_budget));
        }
        Ok(bounds)
    }
}
