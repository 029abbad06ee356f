/// Radar chart rendering over the computed metrics
///
/// Emits a closed polar trace as a standalone interactive HTML file and a
/// per-metric console interpretation. The trace is closed by repeating the
/// first point, so the outline wraps around the last axis.
use crate::analysis::RadarMetric;
use crate::errors::ScopeError;
use crate::logger::{self, LogTag};
use plotly::common::{Fill, Title};
use plotly::layout::{Layout, Margin};
use plotly::{Plot, ScatterPolar};
use std::path::Path;

/// Interpretation buckets for the console read-out
const LEVEL_HIGH: f64 = 0.66;
const LEVEL_MEDIUM: f64 = 0.33;

/// Bucket a metric value into a coarse level label
pub fn interpretation_level(value: f64) -> &'static str {
    if value > LEVEL_HIGH {
        "high"
    } else if value > LEVEL_MEDIUM {
        "medium"
    } else {
        "low"
    }
}

/// Build the radar plot and write it as a standalone HTML file
pub fn render_radar(metrics: &[RadarMetric], path: &Path) -> Result<(), ScopeError> {
    if metrics.is_empty() {
        return Err(ScopeError::Chart("No metrics to plot".to_string()));
    }

    let mut theta: Vec<String> = metrics.iter().map(|m| m.label.to_string()).collect();
    let mut r: Vec<f64> = metrics.iter().map(|m| m.value).collect();
    let mut descriptions: Vec<String> =
        metrics.iter().map(|m| m.description.to_string()).collect();

    // Close the outline
    theta.push(theta[0].clone());
    r.push(r[0]);
    descriptions.push(descriptions[0].clone());

    let trace = ScatterPolar::new(theta, r)
        .name("ERC20 transfer profile")
        .fill(Fill::ToSelf)
        .text_array(descriptions)
        .hover_template("<b>%{theta}</b><br>value: %{r:.3f}<br>%{text}<extra></extra>");

    let layout = Layout::new()
        .title(Title::with_text("ERC20 transfer profile (normalized indicators)"))
        .margin(Margin::new().top(50).bottom(50).left(50).right(50));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot.write_html(path);

    logger::debug(LogTag::Chart, &format!("Chart written to {}", path.display()));
    Ok(())
}

/// Print the per-metric interpretation lines
pub fn print_interpretation(metrics: &[RadarMetric]) {
    println!("\n📌 Radar interpretation:");
    for metric in metrics {
        println!(
            "- {} ({}): {} ({:.2})",
            metric.label,
            metric.description,
            interpretation_level(metric.value),
            metric.value
        );
    }
}
