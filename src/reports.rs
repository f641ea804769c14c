use crate::error::PlanError;
use crate::quote::Quote;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;

/// Indented, human-readable rendering of a quote and its plan tree, one
/// line per ordered fragment.
pub fn assembly_step_summary(quote: &Quote) -> String {
    let mut out = String::new();
    render_quote(quote, 0, &mut out);
    out
}

fn render_quote(quote: &Quote, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if quote.feasible {
        let _ = writeln!(
            out,
            "{indent}{}: {} bp, price {:.2}, lead time {:.1}",
            quote.supplier, quote.sequence_length, quote.price, quote.lead_time
        );
    } else {
        let _ = writeln!(
            out,
            "{indent}{}: infeasible ({})",
            quote.supplier,
            quote.message.as_deref().unwrap_or("no reason given")
        );
    }
    if let Some(plan) = &quote.assembly_plan {
        for fragment in &plan.fragments {
            let _ = writeln!(
                out,
                "{indent}  fragment {}..{} ({} bp):",
                fragment.segment.start,
                fragment.segment.end,
                fragment.sequence.len()
            );
            render_quote(&fragment.quote, depth + 2, out);
        }
    }
}

/// Writes the quote (plan tree included, if present) as pretty JSON.
pub fn write_json_report(quote: &Quote, path: &str) -> Result<(), PlanError> {
    let text = serde_json::to_string_pretty(quote)
        .map_err(|e| PlanError::internal(format!("could not serialize quote: {e}")))?;
    std::fs::write(path, text)
        .map_err(|e| PlanError::io(format!("could not write report '{path}': {e}")))
}

/// Same JSON report, gzip-compressed.
pub fn write_json_report_gz(quote: &Quote, path: &str) -> Result<(), PlanError> {
    let text = serde_json::to_string_pretty(quote)
        .map_err(|e| PlanError::internal(format!("could not serialize quote: {e}")))?;
    let file = File::create(path)
        .map_err(|e| PlanError::io(format!("could not create report '{path}': {e}")))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(text.as_bytes())
        .and_then(|_| encoder.finish().map(|_| ()))
        .map_err(|e| PlanError::io(format!("could not write report '{path}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{AssemblyPlan, PlannedFragment};
    use crate::segment_selector::Segment;
    use crate::sequence::DnaSequence;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn planned_quote() -> Quote {
        let child = Quote::feasible("CheapDNA.com", 54, 5.4, 10.0);
        Quote::feasible("Oligo Assembly Station", 100, 5.4, 18.0).with_plan(AssemblyPlan {
            fragments: vec![PlannedFragment {
                segment: Segment::new(0, 50),
                sequence: DnaSequence::new("ACGT").unwrap(),
                quote: child,
            }],
        })
    }

    #[test]
    fn test_summary_renders_the_tree() {
        let summary = assembly_step_summary(&planned_quote());
        assert!(summary.contains("Oligo Assembly Station: 100 bp, price 5.40"));
        assert!(summary.contains("fragment 0..50"));
        assert!(summary.contains("CheapDNA.com"));
    }

    #[test]
    fn test_summary_reports_infeasibility() {
        let quote = Quote::infeasible("market", 100, "no candidate supplier was feasible");
        let summary = assembly_step_summary(&quote);
        assert!(summary.contains("infeasible"));
        assert!(summary.contains("no candidate supplier was feasible"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let quote = planned_quote();
        write_json_report(&quote, path.to_str().unwrap()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Quote = serde_json::from_str(&text).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn test_gzip_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json.gz");
        let quote = planned_quote();
        write_json_report_gz(&quote, path.to_str().unwrap()).unwrap();
        let file = std::fs::File::open(&path).unwrap();
        let mut text = String::new();
        GzDecoder::new(file).read_to_string(&mut text).unwrap();
        let back: Quote = serde_json::from_str(&text).unwrap();
        assert_eq!(back, quote);
    }
}
