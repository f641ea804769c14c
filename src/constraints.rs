use crate::error::PlanError;
use crate::sequence::DnaSequence;
use std::fmt;
use std::sync::Arc;

pub type SequencePredicate = Arc<dyn Fn(&DnaSequence) -> bool + Send + Sync>;

/// A pure, deterministic predicate over a sequence. Suppliers combine their
/// constraints with AND; a failing constraint makes the supplier report an
/// infeasible quote, never an error.
#[derive(Clone)]
pub enum SequenceConstraint {
    LengthRange { min: usize, max: usize },
    MaxLength(usize),
    NoPattern(String),
    Custom { label: String, predicate: SequencePredicate },
}

impl SequenceConstraint {
    pub fn length_range(min: usize, max: usize) -> Result<Self, PlanError> {
        if min > max {
            return Err(PlanError::configuration(format!(
                "length range {min}..={max} has min > max"
            )));
        }
        if max == 0 {
            return Err(PlanError::configuration("length range with max == 0"));
        }
        Ok(Self::LengthRange { min, max })
    }

    pub fn max_length(max: usize) -> Result<Self, PlanError> {
        if max == 0 {
            return Err(PlanError::configuration("maximum length of 0"));
        }
        Ok(Self::MaxLength(max))
    }

    /// Case-sensitive forbidden substring over the uppercase ACGT alphabet.
    pub fn no_pattern<S: AsRef<str>>(pattern: S) -> Result<Self, PlanError> {
        let pattern = pattern.as_ref().to_ascii_uppercase();
        if pattern.is_empty() {
            return Err(PlanError::configuration("empty forbidden pattern"));
        }
        if !pattern.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')) {
            return Err(PlanError::configuration(format!(
                "forbidden pattern '{pattern}' is not plain ACGT"
            )));
        }
        Ok(Self::NoPattern(pattern))
    }

    pub fn custom<S, F>(label: S, predicate: F) -> Self
    where
        S: Into<String>,
        F: Fn(&DnaSequence) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, sequence: &DnaSequence) -> bool {
        match self {
            Self::LengthRange { min, max } => (*min..=*max).contains(&sequence.len()),
            Self::MaxLength(max) => sequence.len() <= *max,
            Self::NoPattern(pattern) => !sequence.contains_pattern(pattern),
            Self::Custom { predicate, .. } => predicate(sequence),
        }
    }
}

pub fn check_all(constraints: &[SequenceConstraint], sequence: &DnaSequence) -> bool {
    constraints.iter().all(|c| c.check(sequence))
}

impl fmt::Debug for SequenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthRange { min, max } => write!(f, "LengthRange({min}..={max})"),
            Self::MaxLength(max) => write!(f, "MaxLength({max})"),
            Self::NoPattern(pattern) => write!(f, "NoPattern({pattern})"),
            Self::Custom { label, .. } => write!(f, "Custom({label})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_length_range() {
        let constraint = SequenceConstraint::length_range(4, 8).unwrap();
        assert!(!constraint.check(&DnaSequence::new("ACG").unwrap()));
        assert!(constraint.check(&DnaSequence::new("ACGT").unwrap()));
        assert!(constraint.check(&DnaSequence::new("ACGTACGT").unwrap()));
        assert!(!constraint.check(&DnaSequence::new("ACGTACGTA").unwrap()));
    }

    #[test]
    fn test_length_range_rejects_inverted_bounds() {
        let err = SequenceConstraint::length_range(10, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::Configuration);
    }

    #[test]
    fn test_no_pattern() {
        let constraint = SequenceConstraint::no_pattern("GGTCTC").unwrap();
        assert!(constraint.check(&DnaSequence::new("AAAACCCC").unwrap()));
        assert!(!constraint.check(&DnaSequence::new("AAGGTCTCAA").unwrap()));
    }

    #[test]
    fn test_no_pattern_rejects_non_acgt() {
        assert!(SequenceConstraint::no_pattern("GGWCTC").is_err());
        assert!(SequenceConstraint::no_pattern("").is_err());
    }

    #[test]
    fn test_custom_predicate() {
        let constraint = SequenceConstraint::custom("starts with ATG", |seq: &DnaSequence| {
            seq.as_str().starts_with("ATG")
        });
        assert!(constraint.check(&DnaSequence::new("ATGAAA").unwrap()));
        assert!(!constraint.check(&DnaSequence::new("AAATGA").unwrap()));
    }

    #[test]
    fn test_check_all_is_logical_and() {
        let constraints = vec![
            SequenceConstraint::max_length(10).unwrap(),
            SequenceConstraint::no_pattern("GGTCTC").unwrap(),
        ];
        assert!(check_all(&constraints, &DnaSequence::new("ACGTACGT").unwrap()));
        assert!(!check_all(&constraints, &DnaSequence::new("GGTCTCAA").unwrap()));
        assert!(!check_all(
            &constraints,
            &DnaSequence::new("ACGTACGTACGT").unwrap()
        ));
    }
}
