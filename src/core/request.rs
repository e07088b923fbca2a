use crate::core::{AllocationRequest, ChannelBound, TimeGranularity};
use crate::utils::error::{AllocError, Result};
use std::collections::BTreeMap;

/// Assembles raw user input into a validated [`AllocationRequest`].
///
/// The channel set is injected at construction so the builder works for any
/// model, not just the four channels the default artifact was trained on.
/// Validation is a pure function of the inputs: same inputs, same outcome.
pub struct AllocationRequestBuilder {
    channels: Vec<String>,
}

impl AllocationRequestBuilder {
    pub fn new(channels: Vec<String>) -> Self {
        Self { channels }
    }

    /// Validate the inputs and build a request, or report the first failure.
    ///
    /// Checks run in a fixed order so the caller sees the most fundamental
    /// problem first: budget/period, then channel-set coverage, then each
    /// channel's bounds. A failure here means the optimizer is never called.
    pub fn collect_and_validate(
        &self,
        total_budget: f64,
        time_period: u32,
        per_channel_bounds: &BTreeMap<String, (f64, f64)>,
    ) -> Result<AllocationRequest> {
        if !(total_budget > 0.0) || time_period == 0 {
            return Err(AllocError::InvalidBudgetPeriod {
                total_budget,
                time_period: time_period as i64,
            });
        }

        for channel in per_channel_bounds.keys() {
            if !self.channels.iter().any(|c| c == channel) {
                return Err(AllocError::UnknownChannel {
                    channel: channel.clone(),
                });
            }
        }

        let mut bounds = BTreeMap::new();
        for channel in &self.channels {
            let (min, max) = match per_channel_bounds.get(channel) {
                Some(pair) => *pair,
                None => {
                    return Err(AllocError::MissingChannel {
                        channel: channel.clone(),
                    })
                }
            };

            Self::check_bound(channel, min, max, total_budget)?;
            bounds.insert(channel.clone(), ChannelBound::new(min, max));
        }

        Ok(AllocationRequest {
            total_budget,
            time_period,
            granularity: TimeGranularity::Daily,
            bounds,
        })
    }

    fn check_bound(channel: &str, min: f64, max: f64, total_budget: f64) -> Result<()> {
        let fail = |reason: &str| {
            Err(AllocError::InvalidBounds {
                channel: channel.to_string(),
                min,
                max,
                reason: reason.to_string(),
            })
        };

        if !min.is_finite() || !max.is_finite() {
            return fail("bounds must be finite numbers");
        }
        if min < 0.0 {
            return fail("minimum must be non-negative");
        }
        if max <= min {
            return fail("maximum must be greater than minimum");
        }
        if max > total_budget {
            return fail("maximum cannot exceed the total budget");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_CHANNELS;

    fn builder() -> AllocationRequestBuilder {
        AllocationRequestBuilder::new(DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect())
    }

    fn uniform_bounds(min: f64, max: f64) -> BTreeMap<String, (f64, f64)> {
        DEFAULT_CHANNELS
            .iter()
            .map(|c| (c.to_string(), (min, max)))
            .collect()
    }

    #[test]
    fn test_valid_request_keeps_bounds_exactly() {
        let bounds = uniform_bounds(0.0, 50000.0);
        let request = builder()
            .collect_and_validate(50000.0, 90, &bounds)
            .unwrap();

        assert_eq!(request.total_budget, 50000.0);
        assert_eq!(request.time_period, 90);
        assert_eq!(request.granularity, TimeGranularity::Daily);
        assert_eq!(request.bounds.len(), 4);
        for channel in DEFAULT_CHANNELS {
            let bound = request.bounds.get(channel).unwrap();
            assert_eq!(bound.min, 0.0);
            assert_eq!(bound.max, 50000.0);
        }
    }

    #[test]
    fn test_zero_budget_fails_regardless_of_bounds() {
        let bounds = uniform_bounds(0.0, 50000.0);
        let err = builder()
            .collect_and_validate(0.0, 90, &bounds)
            .unwrap_err();
        assert!(matches!(err, AllocError::InvalidBudgetPeriod { .. }));
    }

    #[test]
    fn test_negative_budget_and_zero_period_fail() {
        let bounds = uniform_bounds(0.0, 100.0);
        assert!(matches!(
            builder().collect_and_validate(-1.0, 90, &bounds),
            Err(AllocError::InvalidBudgetPeriod { .. })
        ));
        assert!(matches!(
            builder().collect_and_validate(50000.0, 0, &bounds),
            Err(AllocError::InvalidBudgetPeriod { .. })
        ));
    }

    #[test]
    fn test_max_equal_min_fails() {
        let bounds = uniform_bounds(100.0, 100.0);
        let err = builder()
            .collect_and_validate(50000.0, 90, &bounds)
            .unwrap_err();
        assert!(matches!(err, AllocError::InvalidBounds { .. }));
    }

    #[test]
    fn test_single_bad_channel_fails() {
        let mut bounds = uniform_bounds(0.0, 1000.0);
        bounds.insert("facebook_ads_c".to_string(), (500.0, 200.0));
        let err = builder()
            .collect_and_validate(50000.0, 90, &bounds)
            .unwrap_err();
        match err {
            AllocError::InvalidBounds { channel, .. } => assert_eq!(channel, "facebook_ads_c"),
            other => panic!("expected InvalidBounds, got {other:?}"),
        }
    }

    #[test]
    fn test_budget_period_checked_before_bounds() {
        // Both budget and bounds are bad; the budget failure must win.
        let bounds = uniform_bounds(100.0, 100.0);
        let err = builder()
            .collect_and_validate(0.0, 90, &bounds)
            .unwrap_err();
        assert!(matches!(err, AllocError::InvalidBudgetPeriod { .. }));
    }

    #[test]
    fn test_max_above_total_budget_fails() {
        let bounds = uniform_bounds(0.0, 60000.0);
        let err = builder()
            .collect_and_validate(50000.0, 90, &bounds)
            .unwrap_err();
        assert!(matches!(err, AllocError::InvalidBounds { .. }));
    }

    #[test]
    fn test_missing_and_unknown_channels() {
        let mut bounds = uniform_bounds(0.0, 1000.0);
        bounds.remove("amazon_ads_c");
        assert!(matches!(
            builder().collect_and_validate(50000.0, 90, &bounds),
            Err(AllocError::MissingChannel { .. })
        ));

        let mut bounds = uniform_bounds(0.0, 1000.0);
        bounds.insert("tiktok_ads_c".to_string(), (0.0, 1000.0));
        assert!(matches!(
            builder().collect_and_validate(50000.0, 90, &bounds),
            Err(AllocError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let bounds = uniform_bounds(0.0, 50000.0);
        let b = builder();
        let first = b.collect_and_validate(50000.0, 90, &bounds).unwrap();
        let second = b.collect_and_validate(50000.0, 90, &bounds).unwrap();
        assert_eq!(first, second);

        let bad = uniform_bounds(100.0, 100.0);
        assert!(b.collect_and_validate(50000.0, 90, &bad).is_err());
        assert!(b.collect_and_validate(50000.0, 90, &bad).is_err());
    }
}
