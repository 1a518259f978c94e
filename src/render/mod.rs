//! Chart Rendering
//!
//! The rendering side of the dashboard. Reports hand typed points to a
//! [`ChartRenderer`]; the bundled [`ChartJsRenderer`] turns them into Chart.js
//! configurations and [`page`] lays those out in an HTML page.

mod chartjs;
pub mod page;

pub use chartjs::{ChartConfig, ChartJsRenderer};
pub use page::{build_dashboard, render_page, ChartOutcome};

use crate::report::ChartPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Consumer of report output
pub trait ChartRenderer {
    type Output;

    /// One series: each point's label is a category, its value a magnitude
    fn render_distribution(&self, points: &[ChartPoint], target_id: &str) -> Self::Output;

    /// Two series over the same labels; labels are taken from `series_a`
    fn render_comparison(
        &self,
        series_a: &[ChartPoint],
        series_b: &[ChartPoint],
        target_id: &str,
    ) -> Self::Output;
}

/// Source of chart colours
pub trait ColorSource {
    /// Next colour as a CSS `rgb(...)` string
    fn next_color(&mut self) -> String;
}

/// Seeded random colours; the same seed gives the same sequence
#[derive(Debug, Clone)]
pub struct SeededColors {
    rng: StdRng,
}

impl SeededColors {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ColorSource for SeededColors {
    fn next_color(&mut self) -> String {
        let r: u8 = self.rng.random();
        let g: u8 = self.rng.random();
        let b: u8 = self.rng.random();
        format!("rgb({},{},{})", r, g, b)
    }
}
