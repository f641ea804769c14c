use crate::constraints::{SequenceConstraint, check_all};
use crate::error::PlanError;
use crate::quote::Quote;
use crate::sequence::DnaSequence;
use crate::supplier::{DnaSupplier, QuoteCache};
use std::fmt;
use std::sync::Arc;

pub type PricingFunction = Arc<dyn Fn(&DnaSequence) -> f64 + Send + Sync>;

/// How a commercial vendor prices a sequence. Typically monotonic in length.
#[derive(Clone)]
pub enum PricingScheme {
    PerBasepair { rate: f64 },
    FixedPlusPerBasepair { fixed: f64, rate: f64 },
    Custom { label: String, pricing: PricingFunction },
}

impl PricingScheme {
    pub fn per_basepair(rate: f64) -> Result<Self, PlanError> {
        Self::check_rate(rate)?;
        Ok(Self::PerBasepair { rate })
    }

    pub fn fixed_plus_per_basepair(fixed: f64, rate: f64) -> Result<Self, PlanError> {
        Self::check_rate(fixed)?;
        Self::check_rate(rate)?;
        Ok(Self::FixedPlusPerBasepair { fixed, rate })
    }

    pub fn custom<S, F>(label: S, pricing: F) -> Self
    where
        S: Into<String>,
        F: Fn(&DnaSequence) -> f64 + Send + Sync + 'static,
    {
        Self::Custom {
            label: label.into(),
            pricing: Arc::new(pricing),
        }
    }

    fn check_rate(value: f64) -> Result<(), PlanError> {
        if !value.is_finite() || value < 0.0 {
            return Err(PlanError::configuration(format!(
                "price component {value} must be finite and non-negative"
            )));
        }
        Ok(())
    }

    pub fn price(&self, sequence: &DnaSequence) -> f64 {
        match self {
            Self::PerBasepair { rate } => rate * sequence.len() as f64,
            Self::FixedPlusPerBasepair { fixed, rate } => fixed + rate * sequence.len() as f64,
            Self::Custom { pricing, .. } => pricing(sequence),
        }
    }
}

impl fmt::Debug for PricingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerBasepair { rate } => write!(f, "PerBasepair({rate})"),
            Self::FixedPlusPerBasepair { fixed, rate } => {
                write!(f, "FixedPlusPerBasepair({fixed} + {rate}/bp)")
            }
            Self::Custom { label, .. } => write!(f, "Custom({label})"),
        }
    }
}

/// Leaf supplier: an external vendor with a price list, a fixed lead time
/// and a set of acceptance constraints.
#[derive(Debug)]
pub struct CommercialOffer {
    name: String,
    constraints: Vec<SequenceConstraint>,
    pricing: PricingScheme,
    lead_time: f64,
    memoize: bool,
    cache: QuoteCache,
}

impl CommercialOffer {
    pub fn new<S: Into<String>>(
        name: S,
        constraints: Vec<SequenceConstraint>,
        pricing: PricingScheme,
        lead_time: f64,
        memoize: bool,
    ) -> Result<Self, PlanError> {
        if !lead_time.is_finite() || lead_time < 0.0 {
            return Err(PlanError::configuration(format!(
                "lead time {lead_time} must be finite and non-negative"
            )));
        }
        Ok(Self {
            name: name.into(),
            constraints,
            pricing,
            lead_time,
            memoize,
            cache: QuoteCache::new(),
        })
    }

    fn compute_quote(&self, sequence: &DnaSequence) -> Quote {
        if !check_all(&self.constraints, sequence) {
            return Quote::infeasible(&self.name, sequence.len(), "constraint rejected sequence");
        }
        Quote::feasible(
            &self.name,
            sequence.len(),
            self.pricing.price(sequence),
            self.lead_time,
        )
    }
}

impl DnaSupplier for CommercialOffer {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote(&self, sequence: &DnaSequence, _with_plan: bool) -> Quote {
        // Leaf: there is no plan below a vendor order.
        if self.memoize {
            self.cache
                .get_or_compute(sequence.as_str(), || self.compute_quote(sequence))
        } else {
            self.compute_quote(sequence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn offer(rate: f64, max_length: usize) -> CommercialOffer {
        CommercialOffer::new(
            "TestDNA.com",
            vec![SequenceConstraint::max_length(max_length).unwrap()],
            PricingScheme::per_basepair(rate).unwrap(),
            10.0,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_direct_quote_prices_by_length() {
        // 50 bases at 0.10/bp under a 200-base cap: price 5.0.
        let offer = offer(0.10, 200);
        let seq = crate::test_util::test_sequence(50, 1);
        let quote = offer.get_quote(&seq, false);
        assert!(quote.feasible);
        assert_eq!(quote.price, 5.0);
        assert_eq!(quote.lead_time, 10.0);
        // Deterministic across repeated calls.
        assert_eq!(offer.get_quote(&seq, false), quote);
    }

    #[test]
    fn test_constraint_failure_is_infeasible_not_error() {
        let offer = offer(0.10, 40);
        let seq = crate::test_util::test_sequence(50, 1);
        let quote = offer.get_quote(&seq, false);
        assert!(!quote.feasible);
        assert!(quote.message.is_some());
    }

    #[test]
    fn test_forbidden_pattern_rejects_regardless_of_length() {
        let offer = CommercialOffer::new(
            "PickyDNA.com",
            vec![SequenceConstraint::no_pattern("GGTCTC").unwrap()],
            PricingScheme::per_basepair(0.10).unwrap(),
            10.0,
            false,
        )
        .unwrap();
        let seq = DnaSequence::new("AAGGTCTCAA").unwrap();
        assert!(!offer.get_quote(&seq, false).feasible);
    }

    #[test]
    fn test_memoization_skips_recomputation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let offer = CommercialOffer::new(
            "MemoDNA.com",
            vec![],
            PricingScheme::custom("counted 0.10/bp", move |seq: &DnaSequence| {
                counter.fetch_add(1, Ordering::SeqCst);
                0.10 * seq.len() as f64
            }),
            5.0,
            true,
        )
        .unwrap();
        let seq = crate::test_util::test_sequence(30, 8);
        let first = offer.get_quote(&seq, false);
        let second = offer.get_quote(&seq, false);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_lead_time_rejected() {
        let result = CommercialOffer::new(
            "BadDNA.com",
            vec![],
            PricingScheme::per_basepair(0.10).unwrap(),
            -1.0,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fixed_plus_per_basepair() {
        let pricing = PricingScheme::fixed_plus_per_basepair(20.0, 0.5).unwrap();
        let seq = crate::test_util::test_sequence(100, 2);
        assert_eq!(pricing.price(&seq), 70.0);
    }
}
