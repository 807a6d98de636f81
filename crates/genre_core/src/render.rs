//! Display model for predictions. Pure functions of a [`PredictionResult`].

use crate::prediction::{PredictionResult, UNCLASSIFIED_LABEL};

/// One labelled probability bar.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreBar {
    pub label: String,
    pub probability: f64,
    /// Probability as a percentage with one decimal, e.g. `82.0%`.
    pub percent: String,
    /// Share of the full bar width to fill, in [0,1].
    pub fill: f32,
}

impl GenreBar {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
            percent: format_percent(probability),
            fill: bar_fill(probability),
        }
    }
}

/// Everything the result panel draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub top: Vec<GenreBar>,
    /// Full distribution, most likely first; `None` when the service sent none.
    pub distribution: Option<Vec<GenreBar>>,
    pub message: Option<String>,
}

impl ResultView {
    pub fn from_result(result: &PredictionResult) -> Self {
        Self {
            top: top_genre_bars(result),
            distribution: distribution_bars(result),
            message: result.message.clone(),
        }
    }
}

/// Percentage with one decimal. Exact halves round away from zero, where
/// `{:.1}` alone would round them to even.
pub fn format_percent(probability: f64) -> String {
    let percent = probability * 100.0;
    // A value sits exactly between two tenths iff it is an odd number of quarters.
    let quarters = percent * 4.0;
    let percent = if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (percent * 10.0).round() / 10.0
    } else {
        percent
    };
    format!("{percent:.1}%")
}

pub fn bar_fill(probability: f64) -> f32 {
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, 1.0) as f32
}

/// Top genres in the order the service ranked them.
pub fn top_genre_bars(result: &PredictionResult) -> Vec<GenreBar> {
    result
        .top_genres()
        .map(|(label, p)| GenreBar::new(label, p))
        .collect()
}

/// Every genre except the unclassified sentinel, by descending probability
/// and then by label.
pub fn distribution_bars(result: &PredictionResult) -> Option<Vec<GenreBar>> {
    let all = result.all_predictions.as_ref()?;
    let mut bars: Vec<GenreBar> = all
        .iter()
        .filter(|(label, _)| label.as_str() != UNCLASSIFIED_LABEL)
        .map(|(label, &p)| GenreBar::new(label.as_str(), p))
        .collect();
    bars.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.label.cmp(&b.label))
    });
    Some(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn result(all: Option<&[(&str, f64)]>) -> PredictionResult {
        PredictionResult {
            top_3_genres: vec!["Action".into(), "Comedy".into(), "Drama".into()],
            probabilities: vec![0.82, 0.10, 0.05],
            all_predictions: all.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect::<BTreeMap<_, _>>()
            }),
            message: None,
        }
    }

    #[test]
    fn top_genres_keep_rank_and_format_percentages() {
        let bars = top_genre_bars(&result(None));
        let labels: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
        let percents: Vec<_> = bars.iter().map(|b| b.percent.as_str()).collect();
        assert_eq!(labels, ["Action", "Comedy", "Drama"]);
        assert_eq!(percents, ["82.0%", "10.0%", "5.0%"]);
        assert_relative_eq!(bars[0].fill, 0.82);
        assert_relative_eq!(bars[1].fill, 0.10);
        assert_relative_eq!(bars[2].fill, 0.05);
    }

    #[test]
    fn distribution_skips_sentinel() {
        let view = ResultView::from_result(&result(Some(&[
            ("Action", 0.82),
            ("N/A", 0.02),
            ("Comedy", 0.10),
        ])));
        let labels: Vec<_> = view
            .distribution
            .unwrap()
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, ["Action", "Comedy"]);
    }

    #[test]
    fn distribution_sorts_by_probability_then_label() {
        let bars = distribution_bars(&result(Some(&[
            ("Western", 0.3),
            ("Crime", 0.05),
            ("Adventure", 0.3),
            ("Horror", 0.6),
        ])))
        .unwrap();
        let labels: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Horror", "Adventure", "Western", "Crime"]);
    }

    #[test]
    fn no_distribution_without_all_predictions() {
        let view = ResultView::from_result(&result(None));
        assert!(view.distribution.is_none());
        assert_eq!(view.top.len(), 3);
    }

    #[rstest]
    #[case(0.0, "0.0%")]
    #[case(1.0, "100.0%")]
    #[case(0.123, "12.3%")]
    #[case(0.9999, "100.0%")]
    #[case(0.0625, "6.3%")]
    #[case(0.3125, "31.3%")]
    #[case(0.0675, "6.8%")]
    #[case(0.065, "6.5%")]
    fn percent_has_one_decimal(#[case] p: f64, #[case] expected: &str) {
        assert_eq!(format_percent(p), expected);
    }

    #[rstest]
    #[case(-0.2, 0.0)]
    #[case(1.7, 1.0)]
    #[case(f64::NAN, 0.0)]
    #[case(0.5, 0.5)]
    fn fill_is_clamped(#[case] p: f64, #[case] expected: f32) {
        assert_relative_eq!(bar_fill(p), expected);
    }
}
