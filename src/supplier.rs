use crate::quote::Quote;
use crate::sequence::DnaSequence;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// The one capability every supplier has: given a sequence, return a quote
/// or report infeasibility through it.
///
/// Implementations are leaf commercial offers, assembly stations and
/// supplier comparators; composites hold their children as
/// [`SharedSupplier`], so a network forms a DAG whose nodes may serve
/// several parents.
pub trait DnaSupplier: Send + Sync {
    fn name(&self) -> &str;

    /// Quote the sequence. With `with_plan` the returned quote carries the
    /// full recursive assembly plan; without it composites return bare
    /// totals (the cacheable form).
    fn quote(&self, sequence: &DnaSequence, with_plan: bool) -> Quote;

    fn get_quote(&self, sequence: &DnaSequence, with_assembly_plan: bool) -> Quote {
        self.quote(sequence, with_assembly_plan)
    }

    /// Eagerly runs the quoting search for `sequence`, populating the
    /// memoization caches of every supplier along the explored paths.
    /// Idempotent; a later `get_quote` (plan requests included) then mostly
    /// replays cached results.
    fn prepare_network_on_sequence(&self, sequence: &DnaSequence) {
        let _ = self.quote(sequence, false);
    }
}

pub type SharedSupplier = Arc<dyn DnaSupplier>;

/// Per-supplier memoization cache, keyed by exact sequence content.
///
/// Each key owns a write-once slot: at most one computation runs per
/// (supplier, sequence), and concurrent requesters for the same key block on
/// the in-flight result instead of recomputing. Cached quotes never carry
/// plan trees.
#[derive(Debug, Default)]
pub struct QuoteCache {
    slots: Mutex<HashMap<String, Arc<OnceLock<Quote>>>>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Quote
    where
        F: FnOnce() -> Quote,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key.to_string()).or_default().clone()
        };
        slot.get_or_init(compute).clone()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cache_computes_once_per_key() {
        let cache = QuoteCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let quote = cache.get_or_compute("ACGT", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Quote::feasible("vendor", 4, 1.0, 2.0)
            });
            assert_eq!(quote.price, 1.0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_distinguishes_keys() {
        let cache = QuoteCache::new();
        cache.get_or_compute("AAAA", || Quote::feasible("vendor", 4, 1.0, 2.0));
        cache.get_or_compute("CCCC", || Quote::feasible("vendor", 4, 3.0, 2.0));
        assert_eq!(cache.len(), 2);
        let cached = cache.get_or_compute("CCCC", || unreachable!());
        assert_eq!(cached.price, 3.0);
    }
}
