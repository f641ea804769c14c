use crate::error::PlanError;
use crate::quote::{Quote, best_quote};
use crate::sequence::DnaSequence;
use crate::supplier::{DnaSupplier, QuoteCache, SharedSupplier};
use rayon::prelude::*;

/// Market selection: asks every candidate supplier for the same sequence and
/// keeps the best feasible answer (lowest price, ties broken by lead time).
/// The winning quote's `supplier` field names who was chosen.
pub struct SuppliersComparator {
    name: String,
    suppliers: Vec<SharedSupplier>,
    memoize: bool,
    cache: QuoteCache,
}

impl SuppliersComparator {
    pub fn new<S: Into<String>>(
        name: S,
        suppliers: Vec<SharedSupplier>,
        memoize: bool,
    ) -> Result<Self, PlanError> {
        if suppliers.is_empty() {
            return Err(PlanError::configuration(
                "comparator needs at least one candidate supplier",
            ));
        }
        Ok(Self {
            name: name.into(),
            suppliers,
            memoize,
            cache: QuoteCache::new(),
        })
    }

    pub fn suppliers(&self) -> &[SharedSupplier] {
        &self.suppliers
    }

    fn compute_quote(&self, sequence: &DnaSequence, with_plan: bool) -> Quote {
        let quotes: Vec<Quote> = self
            .suppliers
            .par_iter()
            .map(|supplier| supplier.quote(sequence, with_plan))
            .collect();
        best_quote(quotes).unwrap_or_else(|| {
            Quote::infeasible(&self.name, sequence.len(), "no candidate supplier was feasible")
        })
    }
}

impl DnaSupplier for SuppliersComparator {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote(&self, sequence: &DnaSequence, with_plan: bool) -> Quote {
        if with_plan {
            // Plan trees are rebuilt on demand against warm child caches;
            // only bare quotes are cached.
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
