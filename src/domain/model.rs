use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four channels the pre-fitted model was trained on. Injected through
/// configuration rather than hardcoded at the call sites.
pub const DEFAULT_CHANNELS: [&str; 4] = [
    "google_ads_c",
    "facebook_ads_c",
    "amazon_ads_c",
    "microsoft_ads_c",
];

/// Minimum/maximum spend for one channel, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBound {
    pub min: f64,
    pub max: f64,
}

impl ChannelBound {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Time granularity the optimizer spreads the budget over. Only daily is
/// supported by the current model artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    #[default]
    Daily,
}

/// A validated allocation request. Built fresh per invocation, never persisted.
/// BTreeMap keeps channel iteration stable regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub total_budget: f64,
    pub time_period: u32,
    pub granularity: TimeGranularity,
    pub bounds: BTreeMap<String, ChannelBound>,
}

/// Proposed spend and predicted response for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAllocation {
    pub channel: String,
    pub spend: f64,
    pub predicted_response: f64,
}

/// Optimizer output. Consumed only for display, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub allocations: Vec<ChannelAllocation>,
    pub total_spend: f64,
    pub total_response: f64,
}

impl AllocationResult {
    /// Per-channel spend map, the shape shown in the summary section.
    pub fn spend_by_channel(&self) -> BTreeMap<String, f64> {
        self.allocations
            .iter()
            .map(|a| (a.channel.clone(), a.spend))
            .collect()
    }
}

/// One sampled point on a channel's response curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub spend: f64,
    pub response: f64,
}

/// Sampled response curve for one channel, used to locate the point of
/// diminishing returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    pub channel: String,
    pub points: Vec<CurvePoint>,
}
