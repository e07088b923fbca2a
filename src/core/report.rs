use crate::core::{AllocationResult, ResponseCurve};
use std::collections::BTreeMap;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

pub const DISCLAIMER: &str = "\nDisclaimer: The predictions and insights provided by this model are based \
on historical data and the assumptions made during its development. While every effort has been made \
to ensure accuracy, the results should be interpreted with caution and used as a guide rather than a \
definitive outcome. Factors not included in the model, such as unforeseen market changes, external \
disruptions, or inaccuracies in the input data, may influence the actual results. Users are advised \
to combine these predictions with domain expertise and other decision-making tools.\n";

fn bar(value: f64, max_value: f64) -> String {
    if max_value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max_value) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

/// Allocation table plus the "Response vs spent per channel" chart that the
/// prediction view shows after a successful optimizer call.
pub fn render_allocation(result: &AllocationResult) -> String {
    let mut out = String::new();

    writeln!(out, "\nChannel Contribution").unwrap();
    writeln!(out, "{:-<72}", "").unwrap();
    writeln!(
        out,
        "{:<20} {:>14} {:>18}",
        "Channel", "Spend (£)", "Predicted response"
    )
    .unwrap();
    for alloc in &result.allocations {
        writeln!(
            out,
            "{:<20} {:>14.2} {:>18.2}",
            alloc.channel, alloc.spend, alloc.predicted_response
        )
        .unwrap();
    }
    writeln!(out, "{:-<72}", "").unwrap();
    writeln!(
        out,
        "{:<20} {:>14.2} {:>18.2}",
        "Total", result.total_spend, result.total_response
    )
    .unwrap();

    writeln!(out, "\nResponse vs spent per channel").unwrap();
    let max_response = result
        .allocations
        .iter()
        .map(|a| a.predicted_response)
        .fold(0.0_f64, f64::max);
    for alloc in &result.allocations {
        writeln!(
            out,
            "{:<20} {:<width$} {:.2}",
            alloc.channel,
            bar(alloc.predicted_response, max_response),
            alloc.predicted_response,
            width = BAR_WIDTH
        )
        .unwrap();
    }

    out
}

/// The optimized per-channel spend summary shown below the chart.
pub fn render_optimal_allocation(spend: &BTreeMap<String, f64>) -> String {
    let mut out = String::new();
    writeln!(out, "\nOptimized Budget Allocation").unwrap();
    for (channel, amount) in spend {
        writeln!(out, "  {:<20} £{:.2}", channel, amount).unwrap();
    }
    out
}

/// One text chart per channel, sampled response against spend. Flattening
/// bars mark the point of diminishing returns.
pub fn render_curves(curves: &[ResponseCurve]) -> String {
    let mut out = String::new();
    writeln!(out, "\nResponse Curves").unwrap();

    for curve in curves {
        let max_response = curve
            .points
            .iter()
            .map(|p| p.response)
            .fold(0.0_f64, f64::max);
        writeln!(out, "\n{}", curve.channel).unwrap();
        for point in &curve.points {
            writeln!(
                out,
                "  £{:>12.2} {:<width$} {:.2}",
                point.spend,
                bar(point.response, max_response),
                point.response,
                width = BAR_WIDTH
            )
            .unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelAllocation, CurvePoint};

    fn result() -> AllocationResult {
        AllocationResult {
            allocations: vec![
                ChannelAllocation {
                    channel: "google_ads_c".to_string(),
                    spend: 30000.0,
                    predicted_response: 1200.0,
                },
                ChannelAllocation {
                    channel: "facebook_ads_c".to_string(),
                    spend: 20000.0,
                    predicted_response: 600.0,
                },
            ],
            total_spend: 50000.0,
            total_response: 1800.0,
        }
    }

    #[test]
    fn test_render_allocation_contains_channels_and_totals() {
        let output = render_allocation(&result());
        assert!(output.contains("google_ads_c"));
        assert!(output.contains("facebook_ads_c"));
        assert!(output.contains("50000.00"));
        assert!(output.contains("Response vs spent per channel"));
    }

    #[test]
    fn test_bar_scales_with_response() {
        let output = render_allocation(&result());
        let google_bar = output
            .lines()
            .filter(|l| l.starts_with("google_ads_c") && l.contains('█'))
            .next()
            .unwrap();
        let facebook_bar = output
            .lines()
            .filter(|l| l.starts_with("facebook_ads_c") && l.contains('█'))
            .next()
            .unwrap();
        let count = |l: &str| l.chars().filter(|&c| c == '█').count();
        assert_eq!(count(google_bar), BAR_WIDTH);
        assert_eq!(count(facebook_bar), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_curves_lists_every_point() {
        let curves = vec![ResponseCurve {
            channel: "amazon_ads_c".to_string(),
            points: vec![
                CurvePoint {
                    spend: 0.0,
                    response: 0.0,
                },
                CurvePoint {
                    spend: 500.0,
                    response: 120.0,
                },
            ],
        }];
        let output = render_curves(&curves);
        assert!(output.contains("amazon_ads_c"));
        assert!(output.contains("500.00"));
        assert!(output.contains("120.00"));
    }

    #[test]
    fn test_zero_max_response_renders_empty_bar() {
        assert_eq!(bar(0.0, 0.0), "");
    }
}
