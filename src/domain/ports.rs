use crate::domain::model::{AllocationRequest, AllocationResult, ResponseCurve};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Narrow seam over the pre-fitted marketing-mix model. The tool only ever
/// queries curves, requests an allocation, and reads back the last optimal
/// allocation; everything else the modeling library can do stays behind
/// this trait.
#[async_trait]
pub trait FittedModel: Send + Sync {
    /// Channels the model was fitted on.
    fn channels(&self) -> Vec<String>;

    /// Sample each channel's response curve on [0, max_spend].
    async fn response_curves(&self, max_spend: f64, samples: usize) -> Result<Vec<ResponseCurve>>;

    /// Distribute `request.total_budget` across channels to maximize the
    /// predicted response, subject to the per-channel bounds.
    async fn allocate(&self, request: &AllocationRequest) -> Result<AllocationResult>;

    /// Per-channel spend of the most recent successful allocation, if any.
    fn optimal_allocation(&self) -> Option<BTreeMap<String, f64>>;
}

/// Accessors every configuration surface (CLI flags, TOML scenario) provides
/// to the request builder.
pub trait ScenarioProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn total_budget(&self) -> f64;
    fn time_period(&self) -> u32;
    fn channels(&self) -> &[String];
    fn bounds(&self) -> Result<BTreeMap<String, (f64, f64)>>;
}
