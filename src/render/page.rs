//! Dashboard page
//!
//! Runs every report, hands each result to a renderer, and lays the charts
//! out in a single HTML page. Reports are independent: a failed report is
//! logged and replaced by a notice, the other charts still render.

use super::{ChartConfig, ChartRenderer};
use crate::report::{ReportData, ReportError, ReportKind, ReportRunner};
use chrono::{DateTime, Utc};

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Result of one report on the dashboard
#[derive(Debug)]
pub struct ChartOutcome<T> {
    pub kind: ReportKind,
    pub result: Result<T, ReportError>,
}

/// Run all reports and render each one
pub async fn build_dashboard<R: ChartRenderer>(
    runner: &ReportRunner,
    renderer: &R,
) -> Vec<ChartOutcome<R::Output>> {
    let runs = ReportKind::ALL.map(|kind| async move { (kind, runner.run(kind).await) });

    futures_util::future::join_all(runs)
        .await
        .into_iter()
        .map(|(kind, result)| {
            let result = result.map(|data| match data {
                ReportData::Distribution(points) => {
                    renderer.render_distribution(&points, kind.target_id())
                }
                ReportData::Comparison(pair) => {
                    renderer.render_comparison(&pair.male, &pair.female, kind.target_id())
                }
            });

            if let Err(e) = &result {
                tracing::error!(report = kind.slug(), error = %e, "Report failed");
            }

            ChartOutcome { kind, result }
        })
        .collect()
}

/// Render the dashboard HTML
pub fn render_page(
    outcomes: &[ChartOutcome<ChartConfig>],
    generated_at: DateTime<Utc>,
) -> String {
    let mut sections = String::new();
    let mut scripts = String::new();

    for outcome in outcomes {
        let title = escape_html(outcome.kind.title());
        match &outcome.result {
            Ok(chart) => {
                sections.push_str(&format!(
                    "    <section class=\"chart\">\n      <h2>{}</h2>\n      <canvas id=\"{}\"></canvas>\n    </section>\n",
                    title,
                    escape_html(&chart.target_id)
                ));
                scripts.push_str(&format!(
                    "  new Chart(document.getElementById({}).getContext('2d'), {});\n",
                    script_json(&serde_json::Value::from(chart.target_id.as_str())),
                    script_json(&chart.config)
                ));
            }
            Err(e) => {
                sections.push_str(&format!(
                    "    <section class=\"chart failed\">\n      <h2>{}</h2>\n      <p>This chart could not be loaded: {}</p>\n    </section>\n",
                    title,
                    escape_html(&e.to_string())
                ));
            }
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>NY Inpatient Cancer Statistics</title>
  <script src="{chart_js}"></script>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    main {{ display: flex; flex-wrap: wrap; gap: 2rem; }}
    .chart {{ width: 32rem; }}
    .failed p {{ color: #b00020; }}
  </style>
</head>
<body>
  <h1>NY Inpatient Cancer Statistics</h1>
  <main>
{sections}  </main>
  <footer>Generated {generated}</footer>
<script>
{scripts}</script>
</body>
</html>
"#,
        chart_js = CHART_JS_URL,
        sections = sections,
        generated = generated_at.format("%Y-%m-%d %H:%M UTC"),
        scripts = scripts,
    )
}

/// JSON safe to embed inside a `<script>` element
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportsConfig;
    use crate::render::ChartJsRenderer;
    use crate::report::mock::{full_mock, MockSource, AGE_BODY};
    use crate::report::ChartPoint;
    use std::sync::{Arc, Mutex};

    /// Renderer that records what it was handed
    #[derive(Default)]
    struct RecordingRenderer {
        distributions: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
        comparisons: Mutex<Vec<(String, usize, usize)>>,
    }

    impl ChartRenderer for RecordingRenderer {
        type Output = ();

        fn render_distribution(&self, points: &[ChartPoint], target_id: &str) {
            self.distributions.lock().unwrap().push((
                target_id.to_string(),
                points.iter().map(|p| p.label.clone()).collect(),
                points.iter().map(|p| p.value.clone()).collect(),
            ));
        }

        fn render_comparison(&self, a: &[ChartPoint], b: &[ChartPoint], target_id: &str) {
            self.comparisons
                .lock()
                .unwrap()
                .push((target_id.to_string(), a.len(), b.len()));
        }
    }

    #[tokio::test]
    async fn test_distribution_renderer_receives_labels_and_values() {
        let runner = ReportRunner::new(Arc::new(full_mock()), ReportsConfig::default());
        let renderer = RecordingRenderer::default();

        let outcomes = build_dashboard(&runner, &renderer).await;
        assert!(outcomes.iter().all(|o| o.result.is_ok()));

        let distributions = renderer.distributions.lock().unwrap();
        assert_eq!(distributions.len(), 1);
        assert_eq!(distributions[0].0, "pie");
        assert_eq!(distributions[0].1, vec!["0-17", "18-44"]);
        assert_eq!(distributions[0].2, vec!["5", "12"]);

        let comparisons = renderer.comparisons.lock().unwrap();
        assert_eq!(comparisons[0], ("radar".to_string(), 2, 2));
    }

    #[tokio::test]
    async fn test_failed_report_does_not_block_others() {
        let source = MockSource::new()
            .respond("$group=age_group", AGE_BODY)
            .fail("$group=race", 503);
        let runner = ReportRunner::new(Arc::new(source), ReportsConfig::default());
        let renderer = ChartJsRenderer::new(42);

        let outcomes = build_dashboard(&runner, &renderer).await;
        assert_eq!(outcomes[0].kind, ReportKind::CancerByAgeGroup);
        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[1].kind, ReportKind::MortalityByRaceAndGender);
        assert!(outcomes[1].result.as_ref().unwrap_err().is_transport());

        let html = render_page(&outcomes, Utc::now());
        assert!(html.contains("<canvas id=\"pie\">"));
        assert!(!html.contains("<canvas id=\"radar\">"));
        assert!(html.contains("This chart could not be loaded"));
        assert!(html.contains("\"doughnut\""));
    }

    #[tokio::test]
    async fn test_page_contains_both_charts() {
        let runner = ReportRunner::new(Arc::new(full_mock()), ReportsConfig::default());
        let outcomes = build_dashboard(&runner, &ChartJsRenderer::new(42)).await;

        let html = render_page(&outcomes, Utc::now());
        assert!(html.contains(CHART_JS_URL));
        assert!(html.contains("<canvas id=\"pie\">"));
        assert!(html.contains("<canvas id=\"radar\">"));
        assert!(html.contains("getElementById(\"radar\")"));
        assert!(html.contains("Average Mortality Code by Race and Gender"));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let value = serde_json::json!({"label": "</script><b>"});
        assert!(!script_json(&value).contains("</script>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
