use crate::assembly_method::AssemblyMethod;
use crate::assembly_station::AssemblyStation;
use crate::commercial_offer::{CommercialOffer, PricingScheme};
use crate::comparator::SuppliersComparator;
use crate::constraints::SequenceConstraint;
use crate::error::PlanError;
use crate::quote::Quote;
use crate::segment_selector::SegmentSelector;
use crate::sequence::DnaSequence;
use crate::supplier::SharedSupplier;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn default_memoize() -> bool {
    true
}

/// Declarative description of an assembly network: a list of named
/// suppliers referencing each other by name, plus the root to query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub suppliers: Vec<SupplierConfig>,
    pub root: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupplierConfig {
    CommercialOffer {
        name: String,
        pricing: PricingConfig,
        lead_time: f64,
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        forbidden_patterns: Vec<String>,
        #[serde(default = "default_memoize")]
        memoize: bool,
    },
    AssemblyStation {
        name: String,
        method: MethodConfig,
        supplier: String,
        coarse_grain: usize,
        #[serde(default)]
        fine_grain: Option<usize>,
        #[serde(default = "default_memoize")]
        memoize: bool,
    },
    Comparator {
        name: String,
        candidates: Vec<String>,
        #[serde(default = "default_memoize")]
        memoize: bool,
    },
}

impl SupplierConfig {
    fn name(&self) -> &str {
        match self {
            Self::CommercialOffer { name, .. }
            | Self::AssemblyStation { name, .. }
            | Self::Comparator { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingConfig {
    PerBasepair { rate: f64 },
    FixedPlusPerBasepair { fixed: f64, rate: f64 },
}

impl PricingConfig {
    fn to_scheme(&self) -> Result<PricingScheme, PlanError> {
        match self {
            Self::PerBasepair { rate } => PricingScheme::per_basepair(*rate),
            Self::FixedPlusPerBasepair { fixed, rate } => {
                PricingScheme::fixed_plus_per_basepair(*fixed, *rate)
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodProfileConfig {
    pub min_segment_length: usize,
    pub max_segment_length: usize,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodConfig {
    BluntEnd {
        #[serde(flatten)]
        profile: MethodProfileConfig,
    },
    Gibson {
        selector: SegmentSelector,
        #[serde(flatten)]
        profile: MethodProfileConfig,
    },
    GoldenGate {
        enzyme: String,
        #[serde(flatten)]
        profile: MethodProfileConfig,
    },
    BuildAGenome {
        selector: SegmentSelector,
        #[serde(flatten)]
        profile: MethodProfileConfig,
    },
}

impl MethodConfig {
    fn to_method(&self) -> Result<AssemblyMethod, PlanError> {
        match self {
            Self::BluntEnd { profile } => AssemblyMethod::blunt_end(
                profile.min_segment_length,
                profile.max_segment_length,
                profile.cost,
                profile.duration,
            ),
            Self::Gibson { selector, profile } => AssemblyMethod::gibson(
                selector.clone(),
                profile.min_segment_length,
                profile.max_segment_length,
                profile.cost,
                profile.duration,
            ),
            Self::GoldenGate { enzyme, profile } => AssemblyMethod::golden_gate(
                enzyme,
                profile.min_segment_length,
                profile.max_segment_length,
                profile.cost,
                profile.duration,
            ),
            Self::BuildAGenome { selector, profile } => AssemblyMethod::build_a_genome(
                selector.clone(),
                profile.min_segment_length,
                profile.max_segment_length,
                profile.cost,
                profile.duration,
            ),
        }
    }
}

/// A built assembly network: shared supplier nodes resolved from a
/// [`NetworkConfig`]. The composition graph must be acyclic; nodes may be
/// referenced by several parents.
pub struct AssemblyNetwork {
    suppliers: HashMap<String, SharedSupplier>,
    root: SharedSupplier,
}

impl std::fmt::Debug for AssemblyNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyNetwork")
            .field("suppliers", &self.suppliers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AssemblyNetwork {
    pub fn from_json(text: &str) -> Result<Self, PlanError> {
        let config: NetworkConfig = serde_json::from_str(text)
            .map_err(|e| PlanError::configuration(format!("could not parse network config: {e}")))?;
        Self::build(&config)
    }

    pub fn from_json_file(path: &str) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PlanError::io(format!("could not read network config '{path}': {e}")))?;
        Self::from_json(&text)
    }

    pub fn build(config: &NetworkConfig) -> Result<Self, PlanError> {
        let mut by_name: HashMap<&str, &SupplierConfig> = HashMap::new();
        for supplier in &config.suppliers {
            if by_name.insert(supplier.name(), supplier).is_some() {
                return Err(PlanError::configuration(format!(
                    "duplicate supplier name '{}'",
                    supplier.name()
                )));
            }
        }
        let mut built: HashMap<String, SharedSupplier> = HashMap::new();
        let mut in_progress = HashSet::new();
        for supplier in &config.suppliers {
            build_supplier(supplier.name(), &by_name, &mut built, &mut in_progress)?;
        }
        let root = built
            .get(&config.root)
            .ok_or_else(|| {
                PlanError::configuration(format!("root supplier '{}' is not defined", config.root))
            })?
            .clone();
        Ok(Self {
            suppliers: built,
            root,
        })
    }

    pub fn root(&self) -> &SharedSupplier {
        &self.root
    }

    pub fn supplier(&self, name: &str) -> Option<&SharedSupplier> {
        self.suppliers.get(name)
    }

    pub fn prepare_network_on_sequence(&self, sequence: &DnaSequence) {
        self.root.prepare_network_on_sequence(sequence);
    }

    pub fn get_quote(&self, sequence: &DnaSequence, with_assembly_plan: bool) -> Quote {
        self.root.get_quote(sequence, with_assembly_plan)
    }
}

fn build_supplier(
    name: &str,
    by_name: &HashMap<&str, &SupplierConfig>,
    built: &mut HashMap<String, SharedSupplier>,
    in_progress: &mut HashSet<String>,
) -> Result<SharedSupplier, PlanError> {
    if let Some(existing) = built.get(name) {
        return Ok(existing.clone());
    }
    if !in_progress.insert(name.to_string()) {
        return Err(PlanError::configuration(format!(
            "supplier '{name}' is part of a reference cycle; the network must be acyclic"
        )));
    }
    let config = by_name.get(name).ok_or_else(|| {
        PlanError::configuration(format!("reference to undefined supplier '{name}'"))
    })?;
    let supplier: SharedSupplier = match config {
        SupplierConfig::CommercialOffer {
            name,
            pricing,
            lead_time,
            min_length,
            max_length,
            forbidden_patterns,
            memoize,
        } => {
            let mut constraints = Vec::new();
            match (min_length, max_length) {
                (Some(min), Some(max)) => {
                    constraints.push(SequenceConstraint::length_range(*min, *max)?)
                }
                (None, Some(max)) => constraints.push(SequenceConstraint::max_length(*max)?),
                (Some(min), None) => {
                    constraints.push(SequenceConstraint::length_range(*min, usize::MAX)?)
                }
                (None, None) => {}
            }
            for pattern in forbidden_patterns {
                constraints.push(SequenceConstraint::no_pattern(pattern)?);
            }
            Arc::new(CommercialOffer::new(
                name.clone(),
                constraints,
                pricing.to_scheme()?,
                *lead_time,
                *memoize,
            )?)
        }
        SupplierConfig::AssemblyStation {
            name,
            method,
            supplier,
            coarse_grain,
            fine_grain,
            memoize,
        } => {
            let downstream = build_supplier(supplier, by_name, built, in_progress)?;
            Arc::new(AssemblyStation::new(
                name.clone(),
                method.to_method()?,
                downstream,
                *coarse_grain,
                *fine_grain,
                *memoize,
            )?)
        }
        SupplierConfig::Comparator {
            name,
            candidates,
            memoize,
        } => {
            let mut resolved = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                resolved.push(build_supplier(candidate, by_name, built, in_progress)?);
            }
            Arc::new(SuppliersComparator::new(name.clone(), resolved, *memoize)?)
        }
    };
    in_progress.remove(name);
    built.insert(name.to_string(), supplier.clone());
    Ok(supplier)
}
