use crate::model::mask::MaskPolicy;
use crate::model::score::RatingEstimate;
use crate::pipeline::summary::DatasetSummary;
use crate::pipeline::view::DisplayPayload;
use crate::report::format_f64_3;

pub const MAX_SCORE: f64 = 5.0;
pub const BAR_WIDTH: usize = 40;

pub fn render_payload_text(payload: &DisplayPayload, policy: &MaskPolicy) -> String {
    let mut out = String::new();

    out.push_str("Review:\n");
    for line in payload.text.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    out.push('\n');

    out.push_str("Scores\n");
    let label_width = payload
        .bars
        .iter()
        .map(|b| b.category.label().len())
        .max()
        .unwrap_or(0);
    for bar in &payload.bars {
        out.push_str(&format!(
            "  {:<label_width$}  {:<bar_width$}  {}",
            bar.category.label(),
            bar_glyphs(bar.score),
            format_f64_3(bar.score),
            bar_width = BAR_WIDTH,
        ));
        if bar.masked {
            out.push_str("  (not mentioned)");
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Scores with usefulness below {} are shown as 0.\n",
        format_f64_3(policy.threshold)
    ));
    out
}

pub fn render_estimate_text(estimate: &RatingEstimate) -> String {
    format!(
        "score: {}\nusefulness: {}\n",
        format_f64_3(estimate.score),
        format_f64_3(estimate.usefulness)
    )
}

pub fn render_summary_text(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    out.push_str("Labelled Review Summary\n");
    out.push_str("=======================\n\n");
    out.push_str(&format!("Reviews: {}\n", summary.reviews));
    out.push_str(&format!(
        "Usefulness threshold: {}\n\n",
        format_f64_3(summary.threshold)
    ));
    out.push_str(&format!(
        "{:<12}{:>10}{:>10}{:>10}{:>10}{:>12}\n",
        "category", "retained", "fraction", "median", "p90", "usefulness"
    ));
    for c in &summary.categories {
        out.push_str(&format!(
            "{:<12}{:>10}{:>10}{:>10}{:>10}{:>12}\n",
            c.category.label(),
            c.retained,
            format_f64_3(c.retained_fraction),
            c.score_median.map(format_f64_3).unwrap_or_else(|| "-".to_string()),
            c.score_p90.map(format_f64_3).unwrap_or_else(|| "-".to_string()),
            format_f64_3(c.usefulness_median),
        ));
    }
    out
}

fn bar_glyphs(score: f64) -> String {
    let frac = (score / MAX_SCORE).clamp(0.0, 1.0);
    let filled = (frac * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
