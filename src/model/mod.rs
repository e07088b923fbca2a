use crate::domain::model::{
    AllocationRequest, AllocationResult, ChannelAllocation, CurvePoint, ResponseCurve,
};
use crate::domain::ports::FittedModel;
use crate::utils::error::{AllocError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

/// Number of increments the greedy optimizer splits the free budget into.
const ALLOCATION_STEPS: usize = 1000;

/// Saturation parameters for one channel: `alpha` is the response ceiling,
/// `lam` the daily spend at which half of it is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelCurve {
    pub channel: String,
    pub alpha: f64,
    pub lam: f64,
}

impl ChannelCurve {
    /// Predicted response per day at daily spend `s`: `alpha * s / (s + lam)`.
    fn response(&self, daily_spend: f64) -> f64 {
        if daily_spend <= 0.0 {
            return 0.0;
        }
        self.alpha * daily_spend / (daily_spend + self.lam)
    }

    /// Marginal response per currency unit at daily spend `s`. Strictly
    /// decreasing in `s`, which is what makes greedy allocation optimal here.
    fn marginal(&self, daily_spend: f64) -> f64 {
        let denom = daily_spend + self.lam;
        self.alpha * self.lam / (denom * denom)
    }
}

/// On-disk shape of a pre-fitted model. JSON, produced by the fitting
/// pipeline; this tool never writes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    pub trained_at: DateTime<Utc>,
    pub channels: Vec<ChannelCurve>,
}

/// A loaded, read-only model. The only mutable state is the cache of the
/// most recent optimal allocation, kept behind a mutex so the model can be
/// shared as `&self` for the rest of the session.
#[derive(Debug)]
pub struct ArtifactModel {
    artifact: ModelArtifact,
    last_allocation: Mutex<Option<BTreeMap<String, f64>>>,
}

impl ArtifactModel {
    /// Load a model artifact from disk. Anything that prevents ending up
    /// with a usable model (missing file, unreadable file, bad JSON, bad
    /// parameters) reports as `ModelNotFound` for the given path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let not_found = || AllocError::ModelNotFound {
            path: path.display().to_string(),
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            tracing::warn!("failed to read model artifact {}: {}", path.display(), e);
            not_found()
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!("failed to parse model artifact {}: {}", path.display(), e);
            not_found()
        })?;

        Self::check_artifact(&artifact)?;

        tracing::info!(
            name = %artifact.name,
            version = %artifact.version,
            trained_at = %artifact.trained_at,
            channels = artifact.channels.len(),
            "model loaded"
        );

        Ok(Self {
            artifact,
            last_allocation: Mutex::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.artifact.trained_at
    }

    fn check_artifact(artifact: &ModelArtifact) -> Result<()> {
        if artifact.channels.is_empty() {
            return Err(AllocError::ValidationError {
                message: "model artifact contains no channels".to_string(),
            });
        }
        let mut seen = Vec::new();
        for curve in &artifact.channels {
            if seen.contains(&&curve.channel) {
                return Err(AllocError::ValidationError {
                    message: format!("duplicate channel '{}' in model artifact", curve.channel),
                });
            }
            seen.push(&curve.channel);
            if !(curve.alpha > 0.0) || !(curve.lam > 0.0) {
                return Err(AllocError::ValidationError {
                    message: format!(
                        "channel '{}' has non-positive curve parameters",
                        curve.channel
                    ),
                });
            }
        }
        Ok(())
    }

    fn curve(&self, channel: &str) -> Result<&ChannelCurve> {
        self.artifact
            .channels
            .iter()
            .find(|c| c.channel == channel)
            .ok_or_else(|| AllocError::OptimizerFailure {
                message: format!("model was not fitted on channel '{}'", channel),
            })
    }
}

#[async_trait]
impl FittedModel for ArtifactModel {
    fn channels(&self) -> Vec<String> {
        self.artifact
            .channels
            .iter()
            .map(|c| c.channel.clone())
            .collect()
    }

    async fn response_curves(&self, max_spend: f64, samples: usize) -> Result<Vec<ResponseCurve>> {
        if samples < 2 {
            return Err(AllocError::ValidationError {
                message: "response curves need at least 2 samples".to_string(),
            });
        }

        let mut curves = Vec::with_capacity(self.artifact.channels.len());
        for channel_curve in &self.artifact.channels {
            let points = (0..samples)
                .map(|i| {
                    let spend = max_spend * i as f64 / (samples - 1) as f64;
                    CurvePoint {
                        spend,
                        response: channel_curve.response(spend),
                    }
                })
                .collect();
            curves.push(ResponseCurve {
                channel: channel_curve.channel.clone(),
                points,
            });
        }
        Ok(curves)
    }

    /// Greedy marginal-return allocation. Every channel starts at its minimum
    /// bound; the free budget is then handed out in fixed increments, each one
    /// to the channel whose saturation curve is steepest at its current daily
    /// spend, skipping channels already at their maximum.
    async fn allocate(&self, request: &AllocationRequest) -> Result<AllocationResult> {
        let days = request.time_period as f64;

        let mut spend: BTreeMap<&str, f64> = BTreeMap::new();
        let mut committed = 0.0;
        for (channel, bound) in &request.bounds {
            self.curve(channel)?;
            spend.insert(channel.as_str(), bound.min);
            committed += bound.min;
        }

        if committed > request.total_budget {
            return Err(AllocError::OptimizerFailure {
                message: format!(
                    "sum of minimum bounds (£{:.2}) exceeds the total budget (£{:.2})",
                    committed, request.total_budget
                ),
            });
        }

        let mut remaining = request.total_budget - committed;
        let step = remaining / ALLOCATION_STEPS as f64;

        if step > 0.0 {
            loop {
                // Steepest marginal gain among channels with headroom.
                let mut best: Option<(&str, f64, f64)> = None;
                for (channel, bound) in &request.bounds {
                    let current = spend[channel.as_str()];
                    let headroom = bound.max - current;
                    if headroom <= f64::EPSILON {
                        continue;
                    }
                    let gain = self.curve(channel)?.marginal(current / days);
                    if best.map(|(_, g, _)| gain > g).unwrap_or(true) {
                        best = Some((channel.as_str(), gain, headroom));
                    }
                }

                let Some((channel, _, headroom)) = best else {
                    // Every channel is at its maximum; leftover budget stays
                    // unspent rather than violating a bound.
                    break;
                };

                let increment = step.min(headroom).min(remaining);
                *spend.get_mut(channel).unwrap() += increment;
                remaining -= increment;

                if remaining <= f64::EPSILON * request.total_budget {
                    break;
                }
            }
        }

        let mut allocations = Vec::with_capacity(spend.len());
        let mut total_spend = 0.0;
        let mut total_response = 0.0;
        for (channel, amount) in &spend {
            let predicted = days * self.curve(channel)?.response(*amount / days);
            total_spend += *amount;
            total_response += predicted;
            allocations.push(ChannelAllocation {
                channel: (*channel).to_string(),
                spend: *amount,
                predicted_response: predicted,
            });
        }

        let summary: BTreeMap<String, f64> = allocations
            .iter()
            .map(|a| (a.channel.clone(), a.spend))
            .collect();
        *self.last_allocation.lock().map_err(|_| AllocError::OptimizerFailure {
            message: "allocation cache poisoned".to_string(),
        })? = Some(summary);

        tracing::info!(
            total_spend,
            total_response,
            channels = allocations.len(),
            "allocation complete"
        );

        Ok(AllocationResult {
            allocations,
            total_spend,
            total_response,
        })
    }

    fn optimal_allocation(&self) -> Option<BTreeMap<String, f64>> {
        self.last_allocation.lock().ok()?.clone()
    }
}
