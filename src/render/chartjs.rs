//! Chart.js configurations
//!
//! Builds the `new Chart(ctx, config)` objects for the doughnut and radar
//! charts.

use super::{ChartRenderer, ColorSource, SeededColors};
use crate::report::{ChartPoint, ReportKind};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const MALE_COLOR: (u8, u8, u8) = (255, 99, 132);
const FEMALE_COLOR: (u8, u8, u8) = (54, 162, 235);

/// A chart ready to be drawn into a canvas
#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    pub target_id: String,
    pub config: Value,
}

/// Renders points as Chart.js configurations.
///
/// Doughnut colours come from `C`; every chart starts from a fresh copy of
/// the source, so rendering the same points twice gives the same colours.
#[derive(Debug, Clone)]
pub struct ChartJsRenderer<C = SeededColors> {
    colors: C,
}

impl ChartJsRenderer {
    /// Renderer with seeded random colours
    pub fn new(color_seed: u64) -> Self {
        Self::with_colors(SeededColors::new(color_seed))
    }
}

impl<C: ColorSource + Clone> ChartJsRenderer<C> {
    pub fn with_colors(colors: C) -> Self {
        Self { colors }
    }
}

fn magnitude(point: &ChartPoint) -> Value {
    point.magnitude().map(Value::from).unwrap_or(Value::Null)
}

fn radar_dataset(label: &str, data: Vec<Value>, (r, g, b): (u8, u8, u8)) -> Value {
    let solid = format!("rgb({}, {}, {})", r, g, b);
    json!({
        "label": label,
        "data": data,
        "fill": true,
        "backgroundColor": format!("rgba({}, {}, {}, 0.2)", r, g, b),
        "borderColor": solid,
        "pointBackgroundColor": solid,
        "pointBorderColor": "#fff",
        "pointHoverBackgroundColor": "#fff",
        "pointHoverBorderColor": solid,
    })
}

impl<C: ColorSource + Clone> ChartRenderer for ChartJsRenderer<C> {
    type Output = ChartConfig;

    fn render_distribution(&self, points: &[ChartPoint], target_id: &str) -> ChartConfig {
        let mut colors = self.colors.clone();

        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        let data: Vec<Value> = points.iter().map(magnitude).collect();
        let background: Vec<String> = points.iter().map(|_| colors.next_color()).collect();

        ChartConfig {
            target_id: target_id.to_string(),
            config: json!({
                "type": "doughnut",
                "data": {
                    "labels": labels,
                    "datasets": [{
                        "data": data,
                        "backgroundColor": background,
                        "hoverOffset": 4,
                    }],
                },
                "options": {
                    "responsive": true,
                    "plugins": {
                        "legend": { "position": "bottom" },
                        "title": {
                            "display": true,
                            "text": ReportKind::CancerByAgeGroup.title(),
                        },
                    },
                    "animation": { "animateScale": true, "animateRotate": true },
                },
            }),
        }
    }

    fn render_comparison(
        &self,
        series_a: &[ChartPoint],
        series_b: &[ChartPoint],
        target_id: &str,
    ) -> ChartConfig {
        let labels: Vec<&str> = series_a.iter().map(|p| p.label.as_str()).collect();
        let data_a: Vec<Value> = series_a.iter().map(magnitude).collect();

        let by_label: HashMap<&str, &ChartPoint> =
            series_b.iter().map(|p| (p.label.as_str(), p)).collect();
        let data_b: Vec<Value> = labels
            .iter()
            .map(|label| by_label.get(label).map(|p| magnitude(p)).unwrap_or(Value::Null))
            .collect();

        let same_labels = series_b.len() == series_a.len()
            && series_b.iter().all(|p| labels.contains(&p.label.as_str()));
        if !same_labels {
            tracing::warn!(
                target_id,
                labels_a = series_a.len(),
                labels_b = series_b.len(),
                "Comparison series have different labels"
            );
        }

        ChartConfig {
            target_id: target_id.to_string(),
            config: json!({
                "type": "radar",
                "data": {
                    "labels": labels,
                    "datasets": [
                        radar_dataset("Males", data_a, MALE_COLOR),
                        radar_dataset("Females", data_b, FEMALE_COLOR),
                    ],
                },
                "options": {
                    "elements": { "line": { "borderWidth": 3 } },
                    "plugins": {
                        "legend": { "position": "bottom" },
                        "title": {
                            "display": true,
                            "text": ReportKind::MortalityByRaceAndGender.title(),
                        },
                    },
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(&str, &str)]) -> Vec<ChartPoint> {
        pairs.iter().map(|(l, v)| ChartPoint::new(*l, *v)).collect()
    }

    #[test]
    fn test_doughnut() {
        let renderer = ChartJsRenderer::new(42);
        let chart = renderer.render_distribution(&points(&[("0-17", "5"), ("18-44", "12")]), "pie");

        assert_eq!(chart.target_id, "pie");
        assert_eq!(chart.config["type"], "doughnut");
        assert_eq!(chart.config["data"]["labels"], json!(["0-17", "18-44"]));
        assert_eq!(chart.config["data"]["datasets"][0]["data"], json!([5.0, 12.0]));
        assert_eq!(
            chart.config["data"]["datasets"][0]["backgroundColor"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            chart.config["options"]["plugins"]["title"]["text"],
            "Cancer by Age Group"
        );
    }

    #[test]
    fn test_doughnut_colors_deterministic() {
        let renderer = ChartJsRenderer::new(3);
        let input = points(&[("a", "1"), ("b", "2"), ("c", "3")]);

        let first = renderer.render_distribution(&input, "pie");
        let second = renderer.render_distribution(&input, "pie");
        assert_eq!(first.config, second.config);
    }

    #[test]
    fn test_radar_aligns_second_series_by_label() {
        let renderer = ChartJsRenderer::new(42);
        let male = points(&[("Asian", "2.1"), ("White", "2.4")]);
        let female = points(&[("White", "2.3"), ("Asian", "2.0")]);

        let chart = renderer.render_comparison(&male, &female, "radar");
        let datasets = &chart.config["data"]["datasets"];

        assert_eq!(chart.config["type"], "radar");
        assert_eq!(chart.config["data"]["labels"], json!(["Asian", "White"]));
        assert_eq!(datasets[0]["label"], "Males");
        assert_eq!(datasets[0]["data"], json!([2.1, 2.4]));
        assert_eq!(datasets[1]["label"], "Females");
        assert_eq!(datasets[1]["data"], json!([2.0, 2.3]));
        assert_eq!(datasets[1]["borderColor"], "rgb(54, 162, 235)");
    }

    #[test]
    fn test_radar_missing_label_is_null() {
        let renderer = ChartJsRenderer::new(42);
        let male = points(&[("Asian", "2.1"), ("Other Race", "2.2")]);
        let female = points(&[("Asian", "2.0")]);

        let chart = renderer.render_comparison(&male, &female, "radar");
        assert_eq!(chart.config["data"]["datasets"][1]["data"], json!([2.0, null]));
    }

    #[test]
    fn test_unparsable_value_is_null() {
        let renderer = ChartJsRenderer::new(42);
        let chart = renderer.render_distribution(&points(&[("x", "n/a")]), "pie");

        assert_eq!(chart.config["data"]["datasets"][0]["data"], json!([null]));
    }

    #[derive(Clone)]
    struct Palette {
        colors: Vec<&'static str>,
        next: usize,
    }

    impl ColorSource for Palette {
        fn next_color(&mut self) -> String {
            let color = self.colors[self.next % self.colors.len()];
            self.next += 1;
            color.to_string()
        }
    }

    #[test]
    fn test_doughnut_uses_given_colors() {
        let renderer = ChartJsRenderer::with_colors(Palette {
            colors: vec!["red", "green"],
            next: 0,
        });
        let input = points(&[("a", "1"), ("b", "2"), ("c", "3")]);

        let chart = renderer.render_distribution(&input, "pie");
        assert_eq!(
            chart.config["data"]["datasets"][0]["backgroundColor"],
            json!(["red", "green", "red"])
        );

        // A second chart starts from the beginning of the palette again.
        let chart = renderer.render_distribution(&input[..1], "pie");
        assert_eq!(
            chart.config["data"]["datasets"][0]["backgroundColor"],
            json!(["red"])
        );
    }
}
