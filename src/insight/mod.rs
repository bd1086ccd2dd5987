//! Narrative insight and business-action text derived from engine outputs.
//!
//! Pure string generation: a deterministic function of the computed percent
//! change and the business meaning of the value column. The action texts form
//! an explicit (metric, band) table so no combination can silently fall
//! through.

use serde::{Deserialize, Serialize};

use crate::engine::ForecastOutcome;
use crate::recommend::Recommendations;
use crate::series::ValueSemantics;

/// The business quantity a forecast value column measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DeliveryDuration,
    Distance,
    Delay,
    OrderCount,
    CategoricalFrequency,
    PaymentMethod,
    TrafficLevel,
}

impl Metric {
    /// All metrics, for exhaustive iteration in tests and UIs.
    pub const ALL: [Metric; 7] = [
        Metric::DeliveryDuration,
        Metric::Distance,
        Metric::Delay,
        Metric::OrderCount,
        Metric::CategoricalFrequency,
        Metric::PaymentMethod,
        Metric::TrafficLevel,
    ];

    /// Aggregation semantics of this metric's value column.
    pub fn semantics(&self) -> ValueSemantics {
        match self {
            Metric::DeliveryDuration | Metric::Distance | Metric::Delay => ValueSemantics::Numeric,
            Metric::OrderCount => ValueSemantics::OrderCount,
            Metric::CategoricalFrequency | Metric::PaymentMethod | Metric::TrafficLevel => {
                ValueSemantics::Categorical
            }
        }
    }

    /// Human label used in narrative text.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::DeliveryDuration => "delivery time",
            Metric::Distance => "delivery distance",
            Metric::Delay => "delivery delay",
            Metric::OrderCount => "order volume",
            Metric::CategoricalFrequency => "leading product volume",
            Metric::PaymentMethod => "leading payment method volume",
            Metric::TrafficLevel => "peak traffic volume",
        }
    }

    /// Classify a logical value-column name the way the dashboard names its
    /// columns. Unknown names get no metric; callers then pass one
    /// explicitly.
    pub fn from_column(logical: &str) -> Option<Metric> {
        let name = logical.to_lowercase();
        if name.contains("duration") || name.contains("time") {
            Some(Metric::DeliveryDuration)
        } else if name.contains("distance") {
            Some(Metric::Distance)
        } else if name.contains("delay") {
            Some(Metric::Delay)
        } else if name.contains("order_count") {
            Some(Metric::OrderCount)
        } else if name.contains("payment") {
            Some(Metric::PaymentMethod)
        } else if name.contains("traffic") {
            Some(Metric::TrafficLevel)
        } else if name.contains("pizza_type") || name.contains("pizza_size") {
            Some(Metric::CategoricalFrequency)
        } else {
            None
        }
    }

    /// Format a value with this metric's unit.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Metric::DeliveryDuration | Metric::Delay => format!("{value:.1} minutes"),
            Metric::Distance => format!("{value:.1} km"),
            _ => format!("{value:.1}"),
        }
    }
}

/// Magnitude band of the forecast-versus-history percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeBand {
    /// More than +10%.
    SharpRise,
    /// +5% to +10%.
    Rise,
    /// -5% to +5%.
    Stable,
    /// -10% to -5%.
    Decline,
    /// Below -10%.
    SharpDecline,
}

impl ChangeBand {
    /// Band for a percent change. Boundary values fall toward the milder
    /// band (exactly +5% is stable, exactly -10% is a plain decline).
    pub fn classify(percent_change: f64) -> Self {
        if percent_change > 10.0 {
            ChangeBand::SharpRise
        } else if percent_change > 5.0 {
            ChangeBand::Rise
        } else if percent_change >= -5.0 {
            ChangeBand::Stable
        } else if percent_change >= -10.0 {
            ChangeBand::Decline
        } else {
            ChangeBand::SharpDecline
        }
    }
}

/// Narrative output for one forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastNarrative {
    /// What the numbers say.
    pub insight: String,
    /// What the business should do about it.
    pub recommendation: String,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Derive narrative and action text from a forecast outcome.
///
/// The percent change compares the mean forecast against the mean historical
/// actual; a zero historical mean reads as no change rather than dividing by
/// zero.
pub fn describe_forecast(outcome: &ForecastOutcome, metric: Metric) -> ForecastNarrative {
    let actuals: Vec<f64> = outcome.historical.iter().map(|p| p.actual).collect();
    let avg_historical = mean(&actuals);
    let avg_forecast = mean(&outcome.forecast);
    let percent_change = if avg_historical == 0.0 {
        0.0
    } else {
        (avg_forecast - avg_historical) / avg_historical * 100.0
    };
    let band = ChangeBand::classify(percent_change);

    let mut insight = format!(
        "Across {} historical periods the average {} was {}. The forecast for the next {} periods averages {}. ",
        outcome.historical.len(),
        metric.label(),
        metric.format_value(avg_historical),
        outcome.forecast.len(),
        metric.format_value(avg_forecast),
    );
    insight.push_str(&trend_sentence(band, percent_change));
    insight.push_str(&period_breakdown(outcome, metric));

    ForecastNarrative {
        insight,
        recommendation: action_for(metric, band).to_string(),
    }
}

fn trend_sentence(band: ChangeBand, percent_change: f64) -> String {
    match band {
        ChangeBand::SharpRise => format!(
            "A sharp increase of {percent_change:.1}% over the historical average is expected."
        ),
        ChangeBand::Rise => format!(
            "A moderate increase of {percent_change:.1}% over the historical average is expected."
        ),
        ChangeBand::Stable => format!(
            "Values are expected to remain stable, changing about {percent_change:.1}%."
        ),
        ChangeBand::Decline => format!(
            "A moderate decrease of {:.1}% from the historical average is expected.",
            percent_change.abs()
        ),
        ChangeBand::SharpDecline => format!(
            "A sharp decrease of {:.1}% from the historical average is expected.",
            percent_change.abs()
        ),
    }
}

/// Per-month averages of the historical actuals, keyed by the `YYYY-MM`
/// prefix of each period label.
fn period_breakdown(outcome: &ForecastOutcome, metric: Metric) -> String {
    use std::collections::BTreeMap;

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for point in &outcome.historical {
        let month = point.date.get(..7).unwrap_or(&point.date);
        let entry = groups.entry(month).or_insert((0.0, 0));
        entry.0 += point.actual;
        entry.1 += 1;
    }

    let mut text = String::from("\n\nPer-period averages:\n");
    for (month, (sum, count)) in groups {
        text.push_str(&format!(
            "- {}: {}\n",
            month,
            metric.format_value(sum / count as f64)
        ));
    }
    text
}

/// The (metric, band) action table. Every combination has a fixed text.
fn action_for(metric: Metric, band: ChangeBand) -> &'static str {
    use ChangeBand::*;
    use Metric::*;

    match metric {
        DeliveryDuration => match band {
            SharpRise => {
                "Warning: delivery times are forecast to rise sharply. Add drivers, \
                 optimize routes, keep backup riders for peak hours, and coordinate \
                 faster kitchen preparation."
            }
            Rise => {
                "Delivery times are forecast to rise. Consider extra drivers at peak \
                 hours, a tighter packing process, and closer monitoring of the order \
                 queue."
            }
            Stable => {
                "Delivery times are forecast to stay stable. Keep monitoring regularly, \
                 maintain service quality, and have a contingency plan ready."
            }
            Decline => {
                "Delivery times are forecast to improve. Record the practices behind \
                 the gain and keep routes optimal."
            }
            SharpDecline => {
                "Delivery times are forecast to improve sharply. Document what changed, \
                 train drivers on it, and lock in the optimized routes."
            }
        },
        Distance => match band {
            SharpRise => {
                "Warning: delivery distances are forecast to rise sharply. Consider a \
                 new outlet, promotions for nearby areas, and rebalanced delivery \
                 zones."
            }
            Rise => {
                "Delivery distances are forecast to rise. Review per-area marketing \
                 and adjust delivery fees where needed."
            }
            Stable => {
                "Delivery distances are forecast to stay stable. Keep growing the \
                 customer base near existing outlets and maintain delivery efficiency."
            }
            Decline => {
                "Delivery distances are forecast to shrink. Orders are concentrating \
                 closer to outlets; use the headroom to tighten delivery promises."
            }
            SharpDecline => {
                "Delivery distances are forecast to shrink sharply. Revisit zone \
                 pricing and consider whether outlying areas still get coverage."
            }
        },
        Delay => match band {
            SharpRise => {
                "Warning: delays are forecast to rise sharply. Investigate the root \
                 cause, add kitchen staff, and tighten quality control."
            }
            Rise => {
                "Delays are forecast to rise. Review the preparation process and the \
                 staffing schedule."
            }
            Stable => "Delays are forecast to stay under control. Keep up the current pace.",
            Decline => {
                "Delays are forecast to drop. Keep the improvements that got you here \
                 in place."
            }
            SharpDecline => {
                "Delays are forecast to drop sharply. Capture what changed so the gain \
                 survives staff rotation."
            }
        },
        OrderCount => match band {
            SharpRise => {
                "Order volume is forecast to surge. Stock up on ingredients, extend \
                 staffing, and confirm delivery capacity ahead of time."
            }
            Rise => {
                "Order volume is forecast to grow. Plan inventory and staffing for the \
                 busier periods ahead."
            }
            Stable => {
                "Order volume is forecast to hold steady. Plan staffing and inventory \
                 on the usual pattern."
            }
            Decline => {
                "Order volume is forecast to dip. Consider promotions and review \
                 whether recent changes discouraged repeat orders."
            }
            SharpDecline => {
                "Warning: order volume is forecast to fall sharply. Investigate \
                 demand, launch win-back promotions, and trim perishable stock."
            }
        },
        CategoricalFrequency => match band {
            SharpRise => {
                "The leading product is forecast to gain share quickly. Shift the \
                 inventory mix toward it and feature it in promotions."
            }
            Rise => {
                "The leading product is forecast to gain share. Nudge the inventory \
                 mix toward it."
            }
            Stable => {
                "The product mix is forecast to stay stable. Use the breakdown for \
                 routine inventory planning."
            }
            Decline => {
                "The leading product is forecast to lose share. Watch which products \
                 pick up the demand and adjust stock."
            }
            SharpDecline => {
                "The leading product is forecast to lose share quickly. Rebalance \
                 inventory before stock of yesterday's favorite piles up."
            }
        },
        PaymentMethod => match band {
            SharpRise => {
                "The leading payment method is forecast to grow sharply. Make sure \
                 terminals, float, and settlement capacity can absorb it."
            }
            Rise => {
                "The leading payment method is forecast to grow. Check terminal and \
                 cash-handling capacity."
            }
            Stable => {
                "Payment method usage is forecast to stay stable. No operational \
                 changes needed."
            }
            Decline => {
                "The leading payment method is forecast to decline. Verify the \
                 alternatives customers are switching to are fully supported."
            }
            SharpDecline => {
                "The leading payment method is forecast to decline sharply. Audit the \
                 checkout flow for friction in that method."
            }
        },
        TrafficLevel => match band {
            SharpRise => {
                "Peak-traffic conditions are forecast to rise sharply. Schedule \
                 deliveries around congestion windows and widen delivery estimates."
            }
            Rise => {
                "Peak-traffic conditions are forecast to rise. Factor congestion into \
                 routing and delivery promises."
            }
            Stable => {
                "Traffic conditions are forecast to stay stable. Keep current routing \
                 assumptions."
            }
            Decline => {
                "Traffic conditions are forecast to ease. Delivery estimates can be \
                 tightened."
            }
            SharpDecline => {
                "Traffic conditions are forecast to ease considerably. Revisit \
                 delivery-time promises; they may be too conservative now."
            }
        },
    }
}

/// Highlight lines summarizing a recommendation result: the top seller, the
/// strongest positive trend, and the most frequent pair. Views with no data
/// contribute no line.
pub fn describe_recommendations(recommendations: &Recommendations) -> Vec<String> {
    let mut highlights = Vec::new();

    if let Some(top) = recommendations.popular_items.first() {
        highlights.push(format!(
            "\"{}\" is the best seller, appearing in {:.1}% of orders.",
            top.item, top.percentage
        ));
    }

    if let Some(trending) = recommendations.trending.first() {
        if trending.trend > 0.0 {
            highlights.push(format!(
                "\"{}\" is trending, up {:.1}% against the previous window.",
                trending.item,
                trending.trend * 100.0
            ));
        }
    }

    if let Some(pair) = recommendations.frequently_bought_together.first() {
        highlights.push(format!(
            "Customers often order \"{}\" and \"{}\" together ({} times).",
            pair.item1, pair.item2, pair.count
        ));
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HistoricalPoint;
    use crate::recommend::{ItemPair, PopularItem, TrendingItem};

    fn outcome(actuals: &[f64], forecast: &[f64]) -> ForecastOutcome {
        ForecastOutcome {
            success: true,
            method: "Linear Trend".to_string(),
            historical: actuals
                .iter()
                .enumerate()
                .map(|(i, &actual)| HistoricalPoint {
                    date: format!("2024-0{}-01", i + 1),
                    actual,
                    forecast: actual,
                })
                .collect(),
            forecast: forecast.to_vec(),
            periods: forecast.len(),
            error: None,
        }
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(ChangeBand::classify(10.1), ChangeBand::SharpRise);
        assert_eq!(ChangeBand::classify(10.0), ChangeBand::Rise);
        assert_eq!(ChangeBand::classify(5.0), ChangeBand::Stable);
        assert_eq!(ChangeBand::classify(0.0), ChangeBand::Stable);
        assert_eq!(ChangeBand::classify(-5.0), ChangeBand::Stable);
        assert_eq!(ChangeBand::classify(-5.1), ChangeBand::Decline);
        assert_eq!(ChangeBand::classify(-10.0), ChangeBand::Decline);
        assert_eq!(ChangeBand::classify(-10.1), ChangeBand::SharpDecline);
    }

    #[test]
    fn every_metric_band_combination_has_action_text() {
        for metric in Metric::ALL {
            for band in [
                ChangeBand::SharpRise,
                ChangeBand::Rise,
                ChangeBand::Stable,
                ChangeBand::Decline,
                ChangeBand::SharpDecline,
            ] {
                assert!(!action_for(metric, band).is_empty());
            }
        }
    }

    #[test]
    fn rising_duration_forecast_warns_about_delivery_times() {
        // Historical mean 10, forecast mean 12: +20%, sharp rise.
        let narrative = describe_forecast(
            &outcome(&[10.0, 10.0, 10.0], &[12.0, 12.0]),
            Metric::DeliveryDuration,
        );

        assert!(narrative.insight.contains("sharp increase of 20.0%"));
        assert!(narrative.insight.contains("10.0 minutes"));
        assert!(narrative.recommendation.contains("Add drivers"));
    }

    #[test]
    fn stable_forecast_reads_as_stable() {
        let narrative = describe_forecast(
            &outcome(&[10.0, 10.0, 10.0], &[10.2, 10.1]),
            Metric::Distance,
        );
        assert!(narrative.insight.contains("remain stable"));
        assert!(narrative.recommendation.contains("stay stable"));
    }

    #[test]
    fn declining_order_count_suggests_promotions() {
        // -8%: plain decline.
        let narrative =
            describe_forecast(&outcome(&[100.0, 100.0], &[92.0, 92.0]), Metric::OrderCount);
        assert!(narrative.insight.contains("moderate decrease of 8.0%"));
        assert!(narrative.recommendation.contains("promotions"));
    }

    #[test]
    fn zero_historical_mean_reads_as_no_change() {
        let narrative =
            describe_forecast(&outcome(&[0.0, 0.0, 0.0], &[5.0]), Metric::Delay);
        assert!(narrative.insight.contains("changing about 0.0%"));
    }

    #[test]
    fn insight_includes_per_month_breakdown() {
        let mut result = outcome(&[10.0, 20.0], &[15.0]);
        result.historical[0].date = "2024-01-03".to_string();
        result.historical[1].date = "2024-01-20".to_string();

        let narrative = describe_forecast(&result, Metric::Distance);
        assert!(narrative.insight.contains("Per-period averages:"));
        assert!(narrative.insight.contains("- 2024-01: 15.0 km"));
    }

    #[test]
    fn short_period_labels_group_as_themselves() {
        let mut result = outcome(&[4.0], &[4.0]);
        result.historical[0].date = "w1".to_string();
        let narrative = describe_forecast(&result, Metric::OrderCount);
        assert!(narrative.insight.contains("- w1: 4.0"));
    }

    #[test]
    fn metric_semantics_mapping() {
        assert_eq!(
            Metric::DeliveryDuration.semantics(),
            ValueSemantics::Numeric
        );
        assert_eq!(Metric::OrderCount.semantics(), ValueSemantics::OrderCount);
        assert_eq!(
            Metric::PaymentMethod.semantics(),
            ValueSemantics::Categorical
        );
    }

    #[test]
    fn metric_from_column_matches_dashboard_names() {
        assert_eq!(
            Metric::from_column("estimated_duration"),
            Some(Metric::DeliveryDuration)
        );
        assert_eq!(Metric::from_column("distance_km"), Some(Metric::Distance));
        assert_eq!(Metric::from_column("delay_min"), Some(Metric::Delay));
        assert_eq!(Metric::from_column("order_count"), Some(Metric::OrderCount));
        assert_eq!(
            Metric::from_column("payment_method"),
            Some(Metric::PaymentMethod)
        );
        assert_eq!(
            Metric::from_column("traffic_level"),
            Some(Metric::TrafficLevel)
        );
        assert_eq!(
            Metric::from_column("pizza_size"),
            Some(Metric::CategoricalFrequency)
        );
        assert_eq!(Metric::from_column("customer_name"), None);
    }

    #[test]
    fn recommendation_highlights_cover_all_three_views() {
        let recommendations = Recommendations {
            popular_items: vec![PopularItem {
                item: "Margherita".to_string(),
                order_count: 12,
                percentage: 60.0,
            }],
            by_category: Vec::new(),
            frequently_bought_together: vec![ItemPair {
                item1: "Diavola".to_string(),
                item2: "Margherita".to_string(),
                count: 4,
            }],
            trending: vec![TrendingItem {
                item: "Hawaiian".to_string(),
                recent_count: 9,
                trend: 0.5,
            }],
        };

        let highlights = describe_recommendations(&recommendations);
        assert_eq!(highlights.len(), 3);
        assert!(highlights[0].contains("Margherita"));
        assert!(highlights[0].contains("60.0%"));
        assert!(highlights[1].contains("up 50.0%"));
        assert!(highlights[2].contains("4 times"));
    }

    #[test]
    fn negative_trend_produces_no_trending_highlight() {
        let recommendations = Recommendations {
            trending: vec![TrendingItem {
                item: "Calzone".to_string(),
                recent_count: 1,
                trend: -0.4,
            }],
            ..Default::default()
        };
        assert!(describe_recommendations(&recommendations).is_empty());
    }
}
