use crate::core::report;
use crate::core::{AllocationRequest, FittedModel};
use crate::utils::error::Result;

/// Drives the linear workflow: request allocation from the fitted model, then
/// render what came back. Validation already happened in the request builder,
/// so by the time a request reaches the engine it is well-formed.
pub struct AllocationEngine<M: FittedModel> {
    model: M,
}

impl<M: FittedModel> AllocationEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Submit the request to the optimizer and render the allocation report.
    pub async fn run(&self, request: &AllocationRequest) -> Result<String> {
        println!("Requesting allocation...");
        tracing::debug!(
            total_budget = request.total_budget,
            time_period = request.time_period,
            channels = request.bounds.len(),
            "submitting allocation request"
        );

        let result = self.model.allocate(request).await?;
        println!(
            "Allocated £{:.2} across {} channels",
            result.total_spend,
            result.allocations.len()
        );

        let mut output = report::render_allocation(&result);
        if let Some(spend) = self.model.optimal_allocation() {
            output.push_str(&report::render_optimal_allocation(&spend));
        }
        output.push_str(report::DISCLAIMER);

        Ok(output)
    }

    /// Sample and render the response curves, the "where do returns diminish"
    /// view that precedes a prediction.
    pub async fn plot_response_curves(&self, max_spend: f64, samples: usize) -> Result<String> {
        println!("Sampling response curves...");
        let curves = self.model.response_curves(max_spend, samples).await?;
        println!("Sampled {} channel curves", curves.len());

        Ok(report::render_curves(&curves))
    }
}
