//! Text, JSON and CBOR views of a [`Report`].

use std::fmt::Write;

use crate::{
    analysis::Report,
    error::Result,
    vectorizer::evaluate::scoring::Affinity,
};

/// Render the report as plain-text tables
pub fn render_report(report: &Report, precision: usize) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, report, precision);
    out
}

fn write_report(out: &mut String, report: &Report, precision: usize) -> std::fmt::Result {
    writeln!(out, "== TF-IDF weight matrix ==")?;
    writeln!(out, "Each value is the weight of a stem within a fragment.")?;
    write_matrix(out, report, precision)?;
    writeln!(out)?;

    writeln!(out, "== Closest fragment ==")?;
    writeln!(out, "Query: {}", report.query)?;
    let best = &report.best;
    match best.affinity {
        Affinity::High => {
            writeln!(out, "Answer ({}): {}", best.label, best.text)?;
            writeln!(out, "Affinity: {:.*}", precision, best.score)?;
        }
        Affinity::Low => {
            writeln!(out, "Answer, low affinity ({}): {}", best.label, best.text)?;
            writeln!(out, "Affinity: {:.*} (try a more precise query)", precision, best.score)?;
        }
    }
    writeln!(out)?;

    writeln!(out, "== Affinity per fragment ==")?;
    let rows: Vec<Vec<String>> = report
        .ranking
        .iter()
        .map(|r| vec![r.label.clone(), r.text.clone(), format!("{:.*}", precision, r.score)])
        .collect();
    write_table(out, &["Fragment", "Text", "Affinity"], &rows, &[false, false, true])?;
    writeln!(out)?;

    writeln!(out, "== Query stems present in the chosen fragment ==")?;
    if report.matched_stems.is_empty() {
        writeln!(out, "No query stem was found in the chosen fragment.")?;
    } else {
        writeln!(out, "Stems found: {}", report.matched_stems.join(", "))?;
    }
    Ok(())
}

fn write_matrix(out: &mut String, report: &Report, precision: usize) -> std::fmt::Result {
    let mut header: Vec<&str> = vec![""];
    header.extend(report.vocabulary.iter().map(String::as_str));
    let rows: Vec<Vec<String>> = report
        .fragments
        .iter()
        .zip(report.matrix.iter())
        .map(|(fragment, weights)| {
            let mut row = Vec::with_capacity(weights.len() + 1);
            row.push(fragment.label.clone());
            row.extend(weights.iter().map(|w| format!("{:.*}", precision, w)));
            row
        })
        .collect();
    let mut right = vec![true; header.len()];
    right[0] = false;
    write_table(out, &header, &rows, &right)
}

/// Columns padded to their widest cell; `right[i]` right-aligns column `i`
fn write_table(out: &mut String, header: &[&str], rows: &[Vec<String>], right: &[bool]) -> std::fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |out: &mut String, cells: &mut dyn Iterator<Item = &str>| -> std::fmt::Result {
        let mut first = true;
        for (i, cell) in cells.enumerate() {
            if !first {
                out.push_str("  ");
            }
            first = false;
            let width = widths.get(i).copied().unwrap_or(0);
            if right.get(i).copied().unwrap_or(false) {
                write!(out, "{:>width$}", cell, width = width)?;
            } else {
                write!(out, "{:<width$}", cell, width = width)?;
            }
        }
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
        Ok(())
    };

    line(out, &mut header.iter().copied())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(out, &mut rule.iter().map(String::as_str))?;
    for row in rows {
        line(out, &mut row.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Pretty JSON with values rounded to `precision` decimals
pub fn render_json(report: &Report, precision: usize) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.rounded(precision))?)
}

/// CBOR with values rounded to `precision` decimals
pub fn render_cbor(report: &Report, precision: usize) -> Result<Vec<u8>> {
    Ok(serde_cbor::to_vec(&report.rounded(precision))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisConfig};

    fn codex_report(query: &str) -> Report {
        let text = "The watchdog howls under the chilling moon.\n\
                    The feral cat observes the spectral transit of the night.\n\
                    The hound and the feline perform the rite together.";
        analyze(text, query, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn text_contains_all_sections() {
        let report = codex_report("Which creature howls?");
        let text = render_report(&report, 4);
        assert!(text.contains("== TF-IDF weight matrix =="));
        assert!(text.contains("Fragmento 3"));
        assert!(text.contains("howl"));
        assert!(text.contains("0.5000"));
        assert!(text.contains("Answer (Fragmento 1): The watchdog howls under the chilling moon."));
        assert!(text.contains("Stems found: howl"));
        assert!(!text.lines().any(|l| l.ends_with(' ')));
    }

    #[test]
    fn low_affinity_and_no_stems_are_reported() {
        let report = codex_report("zebra");
        let text = render_report(&report, 4);
        assert!(text.contains("Answer, low affinity (Fragmento 1)"));
        assert!(text.contains("0.0000 (try a more precise query)"));
        assert!(text.contains("No query stem was found in the chosen fragment."));
    }

    #[test]
    fn json_is_rounded() {
        let report = codex_report("Which creature howls?");
        let json = render_json(&report, 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["best"]["score"], serde_json::json!(0.5));
        assert_eq!(value["best"]["affinity"], "high");
        assert_eq!(value["matched_stems"], serde_json::json!(["howl"]));
    }

    #[test]
    fn cbor_decodes_back_to_the_rounded_report() {
        let report = codex_report("hound");
        let bytes = render_cbor(&report, 4).unwrap();
        let decoded: Report = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, report.rounded(4));
    }
}
