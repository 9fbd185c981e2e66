//! Plain-text reports for CLI mode.
//!
//! These mirror the three views of the interactive interface: the patient
//! analysis, the population data and the background information. Long
//! lines are wrapped to the requested width.

use std::fmt::Write;

use crate::reference::{all_genotypes, frequency_by_acetylator};
use crate::resolver::Analysis;

/// Default wrapping width.
pub const DEFAULT_WIDTH: usize = 80;

/// Widest bar drawn in the population summary.
const MAX_BAR_WIDTH: usize = 40;

/// Background text shown on the information view.
pub const INFORMATION: &[(&str, &[&str])] = &[
    (
        "Clinical Significance",
        &[
            "NAT2 genetic testing helps identify a patient's acetylator status, which \
             influences isoniazid metabolism in tuberculosis treatment. This information \
             is crucial for:",
            "- Optimizing drug dosage",
            "- Minimizing adverse effects",
            "- Improving treatment outcomes",
        ],
    ),
    (
        "Interpretation Guide",
        &[
            "- Fast acetylators: Higher doses may be needed",
            "- Intermediate acetylators: Standard dosing usually appropriate",
            "- Slow acetylators: Lower doses recommended to prevent toxicity",
        ],
    ),
    (
        "Important Notes",
        &[
            "- This tool is for research and educational purposes",
            "- Clinical decisions require healthcare professional judgment",
            "- Regular monitoring is essential for all patients",
        ],
    ),
];

/// Appends `label: value`, wrapping continuation lines under the value.
fn push_field(out: &mut String, label: &str, value: &str, width: usize) {
    let prefix = format!("{:<22}", format!("{}:", label));
    let indent = " ".repeat(prefix.len());
    let options = textwrap::Options::new(width.max(prefix.len() + 10))
        .initial_indent(&prefix)
        .subsequent_indent(&indent);
    for line in textwrap::wrap(value, options) {
        let _ = writeln!(out, "{}", line);
    }
}

/// Renders a patient analysis.
pub fn render_analysis(analysis: &Analysis, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Patient Genotype Analysis");
    let _ = writeln!(out);
    push_field(&mut out, "Observed calls", &analysis.observed.to_string(), width);
    push_field(&mut out, "Genotype", analysis.call.label(), width);
    push_field(&mut out, "Acetylator status", analysis.call.acetylator_label(), width);
    push_field(
        &mut out,
        "Population frequency",
        &format!("{:.1}%", analysis.call.frequency()),
        width,
    );
    push_field(&mut out, "Recommended dose", analysis.recommendation.dose, width);
    push_field(&mut out, "Risk assessment", analysis.recommendation.risk, width);
    let _ = writeln!(out);
    let _ = writeln!(out, "Clinical Recommendations");
    for line in textwrap::wrap(analysis.recommendation.details, width) {
        let _ = writeln!(out, "{}", line);
    }
    push_field(&mut out, "Monitoring plan", analysis.recommendation.monitoring, width);
    out
}

/// Renders the genotype table and per-class totals.
pub fn render_population(width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Population Statistics");
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<12} {:<14} {:>9}", "Genotype", "Acetylator", "Frequency");
    for record in all_genotypes() {
        let _ = writeln!(
            out,
            "{:<12} {:<14} {:>8.1}%",
            record.label, record.acetylator, record.frequency
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Acetylator Type Distribution");
    let totals = frequency_by_acetylator();
    let max_total = totals.iter().map(|(_, f)| *f).fold(0.0_f64, f64::max);
    let bar_room = width.saturating_sub(30).clamp(1, MAX_BAR_WIDTH);
    for (class, total) in totals {
        let bar_len = if max_total > 0.0 {
            ((total / max_total) * bar_room as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<14} {:>6.1}% {}",
            class.as_str(),
            total,
            "#".repeat(bar_len)
        );
    }
    out
}

/// Renders the background information text.
pub fn render_information(width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "About NAT2 Testing");
    for (heading, paragraphs) in INFORMATION {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading);
        for paragraph in *paragraphs {
            for line in textwrap::wrap(paragraph, width) {
                let _ = writeln!(out, "{}", line);
            }
        }
    }
    out
}
