use crate::error::PlanError;
use crate::melting_temperature::wallace_tm;
use crate::sequence::DnaSequence;
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` over the parent sequence's coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Turns sorted interior cut points into the covering segments of a sequence
/// of the given length. No cuts means a single full-length segment.
pub fn segments_from_cuts(cuts: &[usize], sequence_length: usize) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        segments.push(Segment::new(start, cut));
        start = cut;
    }
    segments.push(Segment::new(start, sequence_length));
    segments
}

// Search bounds: how many covering partitions one proposal pass may return,
// and how many next-cut choices are explored per position.
const MAX_PARTITIONS: usize = 64;
const BRANCHING: usize = 3;

/// Strategy for placing cut points (junctions) when decomposing a sequence.
///
/// `FixedSize` uses a constant overhang length and accepts any position with
/// enough margin for it. `MeltingTemperature` only accepts positions where
/// some window of `min_size..=max_size` bases centered on the cut melts
/// inside the `min_tm..=max_tm` band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SegmentSelector {
    FixedSize {
        overhang: usize,
    },
    MeltingTemperature {
        min_size: usize,
        max_size: usize,
        min_tm: f64,
        max_tm: f64,
    },
}

impl SegmentSelector {
    pub fn fixed_size(overhang: usize) -> Self {
        Self::FixedSize { overhang }
    }

    pub fn melting_temperature(
        min_size: usize,
        max_size: usize,
        min_tm: f64,
        max_tm: f64,
    ) -> Result<Self, PlanError> {
        let selector = Self::MeltingTemperature {
            min_size,
            max_size,
            min_tm,
            max_tm,
        };
        selector.validate()?;
        Ok(selector)
    }

    /// The usual short-homology defaults: 18-25 base windows, 55-65 degrees.
    pub fn melting_temperature_default() -> Self {
        Self::MeltingTemperature {
            min_size: 18,
            max_size: 25,
            min_tm: 55.0,
            max_tm: 65.0,
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        match self {
            Self::FixedSize { .. } => Ok(()),
            Self::MeltingTemperature {
                min_size,
                max_size,
                min_tm,
                max_tm,
            } => {
                if *min_size == 0 || min_size > max_size {
                    return Err(PlanError::configuration(format!(
                        "junction window size range {min_size}..={max_size} is invalid"
                    )));
                }
                if !min_tm.is_finite() || !max_tm.is_finite() || min_tm > max_tm {
                    return Err(PlanError::configuration(format!(
                        "melting temperature band {min_tm}..={max_tm} is invalid"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Whether a cut at `position` leaves room for this selector's junction
    /// material around it.
    pub fn is_valid_cut(&self, sequence: &DnaSequence, position: usize) -> bool {
        let len = sequence.len();
        if position == 0 || position >= len {
            return false;
        }
        match self {
            Self::FixedSize { overhang } => {
                position >= overhang / 2 && position + (overhang - overhang / 2) <= len
            }
            Self::MeltingTemperature { .. } => self.junction_window(sequence, position).is_some(),
        }
    }

    /// Length of the junction material shared across a cut at `position`.
    pub fn overhang_length(&self, sequence: &DnaSequence, position: usize) -> usize {
        match self {
            Self::FixedSize { overhang } => *overhang,
            Self::MeltingTemperature { min_size, .. } => self
                .junction_window(sequence, position)
                .unwrap_or(*min_size),
        }
    }

    /// Best junction window size at `position`: the one whose Tm lands
    /// closest to the middle of the target band. None if no window fits.
    fn junction_window(&self, sequence: &DnaSequence, position: usize) -> Option<usize> {
        let Self::MeltingTemperature {
            min_size,
            max_size,
            min_tm,
            max_tm,
        } = self
        else {
            return None;
        };
        let len = sequence.len();
        let mid_tm = (min_tm + max_tm) / 2.0;
        let mut best: Option<(f64, usize)> = None;
        for size in *min_size..=*max_size {
            let Some(start) = position.checked_sub(size / 2) else {
                continue;
            };
            let end = start + size;
            if end > len {
                continue;
            }
            let tm = wallace_tm(&sequence.as_bytes()[start..end]);
            if tm < *min_tm || tm > *max_tm {
                continue;
            }
            let distance = (tm - mid_tm).abs();
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, size));
            }
        }
        best.map(|(_, size)| size)
    }

    /// Valid cut positions on a `step` grid. For the Tm strategy a grid point
    /// with no usable junction window is replaced by the nearest valid
    /// position within half a step, so sparse junction landscapes are not
    /// lost to grid alignment.
    pub fn candidate_cuts(&self, sequence: &DnaSequence, step: usize) -> Vec<usize> {
        let step = step.max(1);
        let len = sequence.len();
        let mut cuts = Vec::new();
        let mut position = step;
        while position < len {
            if self.is_valid_cut(sequence, position) {
                push_unique(&mut cuts, position);
            } else if matches!(self, Self::MeltingTemperature { .. }) {
                if let Some(near) = self.nearest_valid_cut(sequence, position, step / 2) {
                    push_unique(&mut cuts, near);
                }
            }
            position += step;
        }
        cuts
    }

    fn nearest_valid_cut(
        &self,
        sequence: &DnaSequence,
        position: usize,
        radius: usize,
    ) -> Option<usize> {
        for offset in 1..=radius {
            if position >= offset && self.is_valid_cut(sequence, position - offset) {
                return Some(position - offset);
            }
            if self.is_valid_cut(sequence, position + offset) {
                return Some(position + offset);
            }
        }
        None
    }

    /// Candidate covering partitions of `sequence` into segments of length
    /// `min_length..=max_length`, as sorted interior cut points. An empty
    /// return means no partition satisfies the bounds; the caller treats
    /// that as infeasibility, not an error.
    pub fn propose_partitions(
        &self,
        sequence: &DnaSequence,
        min_length: usize,
        max_length: usize,
        step: usize,
    ) -> Vec<Vec<usize>> {
        let len = sequence.len();
        let mut partitions = Vec::new();
        if (min_length..=max_length).contains(&len) {
            partitions.push(Vec::new());
        }
        let cuts = self.candidate_cuts(sequence, step);
        let mut current = Vec::new();
        self.extend_partition(
            &cuts,
            len,
            min_length,
            max_length,
            0,
            &mut current,
            &mut partitions,
        );
        partitions
    }

    #[allow(clippy::too_many_arguments)]
    fn extend_partition(
        &self,
        cuts: &[usize],
        len: usize,
        min_length: usize,
        max_length: usize,
        position: usize,
        current: &mut Vec<usize>,
        partitions: &mut Vec<Vec<usize>>,
    ) {
        if partitions.len() >= MAX_PARTITIONS {
            return;
        }
        let target = position + (min_length + max_length) / 2;
        let mut reachable: Vec<usize> = cuts
            .iter()
            .copied()
            .filter(|&c| {
                c >= position + min_length && c <= position + max_length && len - c >= min_length
            })
            .collect();
        reachable.sort_by_key(|&c| c.abs_diff(target));
        for cut in reachable.into_iter().take(BRANCHING) {
            current.push(cut);
            let remaining = len - cut;
            if remaining <= max_length {
                partitions.push(current.clone());
            }
            // Keep cutting while the tail is too long, or can still host
            // another segment pair.
            if remaining > max_length || remaining >= 2 * min_length {
                self.extend_partition(
                    cuts,
                    len,
                    min_length,
                    max_length,
                    cut,
                    current,
                    partitions,
                );
            }
            current.pop();
            if partitions.len() >= MAX_PARTITIONS {
                return;
            }
        }
    }
}

fn push_unique(cuts: &mut Vec<usize>, position: usize) {
    match cuts.binary_search(&position) {
        Ok(_) => {}
        Err(index) => cuts.insert(index, position),
    }
}
