use crate::ENZYMES;
use crate::enzymes::TypeIisEnzyme;
use crate::error::PlanError;
use crate::segment_selector::{Segment, SegmentSelector, segments_from_cuts};
use crate::sequence::{DnaSequence, complement};

/// How fragment ends are built at the junctions of a partition.
#[derive(Clone, Debug)]
enum JunctionRule {
    /// Fragment is exactly the segment, no extension.
    BluntEnd,
    /// Adjacent fragments share identical overlapping bases around each cut
    /// (Gibson, yeast recombination, Build-a-Genome oligos).
    Overlap { selector: SegmentSelector },
    /// Fragments carry shared overhang bases plus a Type IIS recognition
    /// site and spacer on each flank (Golden Gate).
    EnzymeFlanks { enzyme: TypeIisEnzyme },
}

/// A fragment-construction strategy plus the per-operation segment bounds
/// and the fixed cost/duration one assembly run adds on top of its
/// fragments' quotes.
#[derive(Clone, Debug)]
pub struct AssemblyMethod {
    name: String,
    junction: JunctionRule,
    min_segment_length: usize,
    max_segment_length: usize,
    cost: f64,
    duration: f64,
}

impl AssemblyMethod {
    pub fn blunt_end(
        min_segment_length: usize,
        max_segment_length: usize,
        cost: f64,
        duration: f64,
    ) -> Result<Self, PlanError> {
        Self::build(
            "blunt-end ligation".to_string(),
            JunctionRule::BluntEnd,
            min_segment_length,
            max_segment_length,
            cost,
            duration,
        )
    }

    pub fn gibson(
        overhang_selector: SegmentSelector,
        min_segment_length: usize,
        max_segment_length: usize,
        cost: f64,
        duration: f64,
    ) -> Result<Self, PlanError> {
        overhang_selector.validate()?;
        Self::build(
            "Gibson assembly".to_string(),
            JunctionRule::Overlap {
                selector: overhang_selector,
            },
            min_segment_length,
            max_segment_length,
            cost,
            duration,
        )
    }

    pub fn golden_gate(
        enzyme_name: &str,
        min_segment_length: usize,
        max_segment_length: usize,
        cost: f64,
        duration: f64,
    ) -> Result<Self, PlanError> {
        let enzyme = ENZYMES.by_name(enzyme_name).ok_or_else(|| {
            PlanError::configuration(format!("unknown Type IIS enzyme '{enzyme_name}'"))
        })?;
        Self::build(
            format!("Golden Gate assembly ({enzyme_name})"),
            JunctionRule::EnzymeFlanks {
                enzyme: enzyme.clone(),
            },
            min_segment_length,
            max_segment_length,
            cost,
            duration,
        )
    }

    /// Overlap assembly tuned to oligo-scale fragments; same junction rule
    /// as Gibson, caller provides the (short) segment bounds.
    pub fn build_a_genome(
        overhang_selector: SegmentSelector,
        min_segment_length: usize,
        max_segment_length: usize,
        cost: f64,
        duration: f64,
    ) -> Result<Self, PlanError> {
        overhang_selector.validate()?;
        Self::build(
            "Build-a-Genome oligo assembly".to_string(),
            JunctionRule::Overlap {
                selector: overhang_selector,
            },
            min_segment_length,
            max_segment_length,
            cost,
            duration,
        )
    }

    fn build(
        name: String,
        junction: JunctionRule,
        min_segment_length: usize,
        max_segment_length: usize,
        cost: f64,
        duration: f64,
    ) -> Result<Self, PlanError> {
        if min_segment_length == 0 || min_segment_length > max_segment_length {
            return Err(PlanError::configuration(format!(
                "segment length bounds {min_segment_length}..={max_segment_length} are invalid"
            )));
        }
        if !cost.is_finite() || cost < 0.0 || !duration.is_finite() || duration < 0.0 {
            return Err(PlanError::configuration(format!(
                "assembly cost {cost} / duration {duration} must be finite and non-negative"
            )));
        }
        Ok(Self {
            name,
            junction,
            min_segment_length,
            max_segment_length,
            cost,
            duration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_segment_length(&self) -> usize {
        self.min_segment_length
    }

    pub fn max_segment_length(&self) -> usize {
        self.max_segment_length
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The selector driving cut placement for this method.
    pub fn selector(&self) -> SegmentSelector {
        match &self.junction {
            JunctionRule::BluntEnd => SegmentSelector::fixed_size(0),
            JunctionRule::Overlap { selector } => selector.clone(),
            JunctionRule::EnzymeFlanks { enzyme } => SegmentSelector::fixed_size(enzyme.overhang),
        }
    }

    /// The literal fragment to order for `segment`, junction material
    /// included. Junctions are implied by the segment's own boundaries:
    /// interior boundaries are cuts, sequence ends are not.
    pub fn fragment_for_segment(&self, sequence: &DnaSequence, segment: Segment) -> DnaSequence {
        let len = sequence.len();
        match &self.junction {
            JunctionRule::BluntEnd => sequence.subsequence(segment.start..segment.end),
            JunctionRule::Overlap { selector } => {
                sequence.subsequence(self.extended_range(sequence, segment, selector, len))
            }
            JunctionRule::EnzymeFlanks { enzyme } => {
                let selector = SegmentSelector::fixed_size(enzyme.overhang);
                let core = sequence.subsequence(self.extended_range(sequence, segment, &selector, len));
                let spacer = "A".repeat(enzyme.spacer);
                let site_rc: String = enzyme
                    .site
                    .bytes()
                    .rev()
                    .map(|b| complement(b) as char)
                    .collect();
                DnaSequence::from_validated(format!(
                    "{}{spacer}{core}{spacer}{site_rc}",
                    enzyme.site
                ))
            }
        }
    }

    /// Segment extended by shared junction material: the overlap at a cut
    /// `c` with overhang `o` spans `[c - o/2, c + o - o/2)` and appears in
    /// both neighboring fragments.
    fn extended_range(
        &self,
        sequence: &DnaSequence,
        segment: Segment,
        selector: &SegmentSelector,
        len: usize,
    ) -> std::ops::Range<usize> {
        let start = if segment.start > 0 {
            let overhang = selector.overhang_length(sequence, segment.start);
            segment.start.saturating_sub(overhang / 2)
        } else {
            segment.start
        };
        let end = if segment.end < len {
            let overhang = selector.overhang_length(sequence, segment.end);
            (segment.end + (overhang - overhang / 2)).min(len)
        } else {
            segment.end
        };
        start..end
    }

    /// All fragments for a partition given as sorted interior cut points.
    pub fn fragments_for_partition(
        &self,
        sequence: &DnaSequence,
        cuts: &[usize],
    ) -> Vec<(Segment, DnaSequence)> {
        segments_from_cuts(cuts, sequence.len())
            .into_iter()
            .map(|segment| (segment, self.fragment_for_segment(sequence, segment)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_sequence;

    #[test]
    fn test_blunt_end_fragment_is_exact_slice() {
        let method = AssemblyMethod::blunt_end(10, 50, 0.0, 1.0).unwrap();
        let seq = test_sequence(60, 2);
        let fragments = method.fragments_for_partition(&seq, &[30]);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].1.as_str(), &seq.as_str()[..30]);
        assert_eq!(fragments[1].1.as_str(), &seq.as_str()[30..]);
    }

    #[test]
    fn test_gibson_fragments_share_junction_bases() {
        let method =
            AssemblyMethod::gibson(SegmentSelector::fixed_size(20), 40, 100, 10.0, 8.0).unwrap();
        let seq = test_sequence(160, 9);
        let fragments = method.fragments_for_partition(&seq, &[80]);
        let left = fragments[0].1.as_str();
        let right = fragments[1].1.as_str();
        // Shared overlap: [70, 90) of the parent appears at the end of the
        // left fragment and the start of the right one.
        assert_eq!(left, &seq.as_str()[0..90]);
        assert_eq!(right, &seq.as_str()[70..160]);
        assert_eq!(&left[left.len() - 20..], &right[..20]);
    }

    #[test]
    fn test_golden_gate_fragment_flanks() {
        let method = AssemblyMethod::golden_gate("BsaI", 40, 100, 2.0, 5.0).unwrap();
        let seq = test_sequence(120, 4);
        let fragments = method.fragments_for_partition(&seq, &[60]);
        let left = fragments[0].1.as_str();
        // Site + one spacer base on the left, spacer + reverse-complemented
        // site on the right.
        assert!(left.starts_with("GGTCTCA"));
        assert!(left.ends_with("AGAGACC"));
        // Core: segment [0, 60) extended by half the 4-base overhang.
        assert_eq!(&left[7..left.len() - 7], &seq.as_str()[0..62]);
    }

    #[test]
    fn test_golden_gate_unknown_enzyme() {
        let err = AssemblyMethod::golden_gate("EcoRI", 40, 100, 0.0, 0.0).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Configuration);
    }

    #[test]
    fn test_invalid_bounds_rejected_at_construction() {
        assert!(AssemblyMethod::blunt_end(100, 40, 0.0, 0.0).is_err());
        assert!(AssemblyMethod::blunt_end(0, 40, 0.0, 0.0).is_err());
        assert!(AssemblyMethod::blunt_end(10, 40, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_single_fragment_has_no_junction_material() {
        let method =
            AssemblyMethod::gibson(SegmentSelector::fixed_size(20), 40, 200, 0.0, 0.0).unwrap();
        let seq = test_sequence(150, 6);
        let fragments = method.fragments_for_partition(&seq, &[]);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].1, seq);
    }
}
