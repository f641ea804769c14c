use crate::assembly_method::AssemblyMethod;
use crate::error::PlanError;
use crate::quote::{AssemblyPlan, PlannedFragment, Quote};
use crate::segment_selector::SegmentSelector;
use crate::sequence::DnaSequence;
use crate::supplier::{DnaSupplier, QuoteCache, SharedSupplier};
use rayon::prelude::*;

/// (total fragment price, max fragment lead time) of a feasible partition.
type PartitionScore = (f64, f64);

/// Composite supplier that builds a sequence from fragments: cuts are chosen
/// by the method's selector, fragments are quoted by the downstream
/// supplier, and the best covering partition wins.
///
/// The search runs in two passes: a coarse pass over selector-proposed
/// partitions on the `coarse_grain` grid, then (when `fine_grain` is set) a
/// hill-climb that nudges each cut of the coarse winner at `fine_grain`
/// resolution within half a coarse step.
pub struct AssemblyStation {
    name: String,
    method: AssemblyMethod,
    supplier: SharedSupplier,
    coarse_grain: usize,
    fine_grain: Option<usize>,
    memoize: bool,
    cache: QuoteCache,
}

impl AssemblyStation {
    pub fn new<S: Into<String>>(
        name: S,
        method: AssemblyMethod,
        supplier: SharedSupplier,
        coarse_grain: usize,
        fine_grain: Option<usize>,
        memoize: bool,
    ) -> Result<Self, PlanError> {
        if coarse_grain == 0 {
            return Err(PlanError::configuration("coarse_grain must be positive"));
        }
        if let Some(fine) = fine_grain {
            if fine == 0 || fine >= coarse_grain {
                return Err(PlanError::configuration(format!(
                    "fine_grain {fine} must be positive and smaller than coarse_grain {coarse_grain}"
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            method,
            supplier,
            coarse_grain,
            fine_grain,
            memoize,
            cache: QuoteCache::new(),
        })
    }

    pub fn method(&self) -> &AssemblyMethod {
        &self.method
    }

    fn compute_quote(&self, sequence: &DnaSequence, with_plan: bool) -> Quote {
        let selector = self.method.selector();
        let partitions = selector.propose_partitions(
            sequence,
            self.method.min_segment_length(),
            self.method.max_segment_length(),
            self.coarse_grain,
        );
        if partitions.is_empty() {
            return Quote::infeasible(
                &self.name,
                sequence.len(),
                format!(
                    "no covering partition with segments of {}..={} bases",
                    self.method.min_segment_length(),
                    self.method.max_segment_length()
                ),
            );
        }

        // Coarse pass: all proposed partitions, in parallel.
        let scored: Vec<(Vec<usize>, Option<PartitionScore>)> = partitions
            .into_par_iter()
            .map(|cuts| {
                let score = self.evaluate_partition(sequence, &cuts);
                (cuts, score)
            })
            .collect();
        let mut best: Option<(Vec<usize>, PartitionScore)> = None;
        for (cuts, score) in scored {
            let Some(score) = score else { continue };
            let better = match &best {
                None => true,
                Some((_, incumbent)) => {
                    score.0 < incumbent.0 || (score.0 == incumbent.0 && score.1 < incumbent.1)
                }
            };
            if better {
                best = Some((cuts, score));
            }
        }
        let Some((mut cuts, mut score)) = best else {
            return Quote::infeasible(
                &self.name,
                sequence.len(),
                "every explored partition had an infeasible fragment",
            );
        };

        // Fine pass: local refinement of the coarse winner.
        if let Some(fine) = self.fine_grain {
            (cuts, score) = self.refine_partition(sequence, &selector, cuts, score, fine);
        }

        let quote = Quote::feasible(
            &self.name,
            sequence.len(),
            score.0 + self.method.cost(),
            score.1 + self.method.duration(),
        );
        if with_plan {
            quote.with_plan(self.plan_for_partition(sequence, &cuts))
        } else {
            quote
        }
    }

    /// Price and lead time of one partition, or None if any fragment is
    /// infeasible downstream. Price is the sum of fragment prices; lead
    /// time is the maximum fragment lead time (fragments are ordered in
    /// parallel, so the slowest one gates the assembly).
    fn evaluate_partition(&self, sequence: &DnaSequence, cuts: &[usize]) -> Option<PartitionScore> {
        let fragments = self.method.fragments_for_partition(sequence, cuts);
        let quotes: Vec<Quote> = fragments
            .par_iter()
            .map(|(_, fragment)| self.supplier.quote(fragment, false))
            .collect();
        if quotes.iter().any(|quote| !quote.feasible) {
            return None;
        }
        let price = quotes.iter().map(|quote| quote.price).sum();
        let lead_time = quotes.iter().map(|quote| quote.lead_time).fold(0.0, f64::max);
        Some((price, lead_time))
    }

    fn refine_partition(
        &self,
        sequence: &DnaSequence,
        selector: &SegmentSelector,
        mut cuts: Vec<usize>,
        mut score: PartitionScore,
        fine: usize,
    ) -> (Vec<usize>, PartitionScore) {
        const MAX_SWEEPS: usize = 4;
        let radius = self.coarse_grain / 2;
        let min_length = self.method.min_segment_length();
        let max_length = self.method.max_segment_length();
        for _ in 0..MAX_SWEEPS {
            let mut improved = false;
            for index in 0..cuts.len() {
                let previous = if index == 0 { 0 } else { cuts[index - 1] };
                let next = if index + 1 == cuts.len() {
                    sequence.len()
                } else {
                    cuts[index + 1]
                };
                let mut offset = fine;
                while offset <= radius {
                    for candidate in
                        [cuts[index].saturating_sub(offset), cuts[index] + offset]
                    {
                        if candidate <= previous || candidate >= next {
                            continue;
                        }
                        let left = candidate - previous;
                        let right = next - candidate;
                        if !(min_length..=max_length).contains(&left)
                            || !(min_length..=max_length).contains(&right)
                        {
                            continue;
                        }
                        if !selector.is_valid_cut(sequence, candidate) {
                            continue;
                        }
                        let mut trial = cuts.clone();
                        trial[index] = candidate;
                        if let Some(trial_score) = self.evaluate_partition(sequence, &trial) {
                            if trial_score.0 < score.0
                                || (trial_score.0 == score.0 && trial_score.1 < score.1)
                            {
                                cuts = trial;
                                score = trial_score;
                                improved = true;
                            }
                        }
                    }
                    offset += fine;
                }
            }
            if !improved {
                break;
            }
        }
        (cuts, score)
    }

    fn plan_for_partition(&self, sequence: &DnaSequence, cuts: &[usize]) -> AssemblyPlan {
        let fragments = self
            .method
            .fragments_for_partition(sequence, cuts)
            .into_par_iter()
            .map(|(segment, fragment)| {
                let quote = self.supplier.quote(&fragment, true);
                PlannedFragment {
                    segment,
                    sequence: fragment,
                    quote,
                }
            })
            .collect();
        AssemblyPlan { fragments }
    }
}

impl DnaSupplier for AssemblyStation {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote(&self, sequence: &DnaSequence, with_plan: bool) -> Quote {
        if with_plan {
            // The cache holds bare quotes; a plan request replays the search
            // against warm downstream caches and attaches the tree.
            return self.compute_quote(sequence, true);
        }
        if self.memoize {
            self.cache
                .get_or_compute(sequence.as_str(), || self.compute_quote(sequence, false))
        } else {
            self.compute_quote(sequence, false)
        }
    }
}
