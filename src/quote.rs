use crate::segment_selector::Segment;
use crate::sequence::DnaSequence;
use serde::{Deserialize, Serialize};

/// The answer a supplier gives for one sequence. Immutable once produced.
///
/// Infeasibility is an expected outcome, not an error: the quote carries
/// `feasible == false` and no meaningful price/lead time, and parents simply
/// drop it from their comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Name of the supplier that produced this quote, for traceability.
    pub supplier: String,
    pub sequence_length: usize,
    pub price: f64,
    pub lead_time: f64,
    pub feasible: bool,
    /// Why the quote is infeasible, when it is.
    pub message: Option<String>,
    /// The recursive plan tree, populated only when a full assembly plan
    /// was requested.
    pub assembly_plan: Option<AssemblyPlan>,
}

/// One tier of a manufacturing plan: which fragments are built and which
/// supplier quotes back each of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPlan {
    pub fragments: Vec<PlannedFragment>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedFragment {
    /// Coordinates of the covered segment in the parent sequence.
    pub segment: Segment,
    /// The literal fragment to order, junction material included.
    pub sequence: DnaSequence,
    pub quote: Quote,
}

impl Quote {
    pub fn feasible<S: Into<String>>(
        supplier: S,
        sequence_length: usize,
        price: f64,
        lead_time: f64,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            sequence_length,
            price,
            lead_time,
            feasible: true,
            message: None,
            assembly_plan: None,
        }
    }

    pub fn infeasible<S: Into<String>, M: Into<String>>(
        supplier: S,
        sequence_length: usize,
        message: M,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            sequence_length,
            price: 0.0,
            lead_time: 0.0,
            feasible: false,
            message: Some(message.into()),
            assembly_plan: None,
        }
    }

    pub fn with_plan(mut self, plan: AssemblyPlan) -> Self {
        self.assembly_plan = Some(plan);
        self
    }

    /// Market ordering: lower price wins, ties broken by lower lead time.
    /// Only meaningful between feasible quotes.
    pub fn is_better_than(&self, other: &Quote) -> bool {
        if !self.feasible {
            return false;
        }
        if !other.feasible {
            return true;
        }
        if self.price != other.price {
            return self.price < other.price;
        }
        self.lead_time < other.lead_time
    }

    /// Human-readable recursive summary of the plan tree.
    pub fn assembly_step_summary(&self) -> String {
        crate::reports::assembly_step_summary(self)
    }
}

/// The best feasible quote of a batch, by the market ordering. None when
/// every candidate is infeasible.
pub fn best_quote<I: IntoIterator<Item = Quote>>(quotes: I) -> Option<Quote> {
    quotes
        .into_iter()
        .filter(|q| q.feasible)
        .reduce(|best, next| if next.is_better_than(&best) { next } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_prefers_price_then_lead_time() {
        let cheap_slow = Quote::feasible("a", 100, 10.0, 20.0);
        let cheap_fast = Quote::feasible("b", 100, 10.0, 5.0);
        let expensive = Quote::feasible("c", 100, 12.0, 1.0);
        assert!(cheap_fast.is_better_than(&cheap_slow));
        assert!(cheap_slow.is_better_than(&expensive));
        assert!(!expensive.is_better_than(&cheap_fast));
    }

    #[test]
    fn test_infeasible_never_wins() {
        let feasible = Quote::feasible("a", 100, 1000.0, 100.0);
        let infeasible = Quote::infeasible("b", 100, "constraint rejected sequence");
        assert!(feasible.is_better_than(&infeasible));
        assert!(!infeasible.is_better_than(&feasible));
    }

    #[test]
    fn test_best_quote_filters_infeasible() {
        let quotes = vec![
            Quote::infeasible("a", 100, "too long"),
            Quote::feasible("b", 100, 8.0, 10.0),
            Quote::feasible("c", 100, 6.0, 30.0),
        ];
        assert_eq!(best_quote(quotes).unwrap().supplier, "c");
        assert!(best_quote(vec![Quote::infeasible("a", 100, "no")]).is_none());
    }

    #[test]
    fn test_plan_tree_serializes() {
        let child = Quote::feasible("vendor", 50, 5.0, 10.0);
        let quote = Quote::feasible("station", 100, 15.0, 18.0).with_plan(AssemblyPlan {
            fragments: vec![PlannedFragment {
                segment: Segment::new(0, 50),
                sequence: crate::sequence::DnaSequence::new("ACGT").unwrap(),
                quote: child,
            }],
        });
        let json = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quote);
    }
}
