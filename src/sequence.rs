use crate::error::PlanError;
use anyhow::Result;
use bio::io::fasta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::ops::Range;

/// A validated DNA sequence: non-empty, uppercase ACGT.
///
/// The exact text content doubles as the identity of the sequence, so it is
/// usable directly as a memoization key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnaSequence(String);

impl DnaSequence {
    pub fn new<S: AsRef<str>>(text: S) -> Result<Self, PlanError> {
        let text = text.as_ref().to_ascii_uppercase();
        if text.is_empty() {
            return Err(PlanError::invalid_input("empty sequence"));
        }
        if let Some(bad) = text.bytes().find(|b| !matches!(b, b'A' | b'C' | b'G' | b'T')) {
            return Err(PlanError::invalid_input(format!(
                "sequence contains '{}', expected only A/C/G/T",
                bad as char
            )));
        }
        Ok(Self(text))
    }

    /// Construction from content that is already known to be valid ACGT,
    /// e.g. concatenations of validated pieces.
    pub(crate) fn from_validated(text: String) -> Self {
        debug_assert!(!text.is_empty());
        debug_assert!(text.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')));
        Self(text)
    }

    pub fn from_fasta_file(filename: &str) -> Result<Vec<DnaSequence>> {
        let file = File::open(filename)?;
        fasta::Reader::new(file)
            .records()
            .filter_map(|record| record.ok())
            .map(|record| Ok(DnaSequence::new(std::str::from_utf8(record.seq())?)?))
            .collect()
    }

    /// Reads a bare sequence file, ignoring whitespace and line breaks.
    pub fn from_text_file(filename: &str) -> Result<DnaSequence> {
        let text = std::fs::read_to_string(filename)?;
        let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(DnaSequence::new(text)?)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        false // a DnaSequence is non-empty by construction
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Extracts `[range.start, range.end)`, clamped to the sequence bounds.
    pub fn subsequence(&self, range: Range<usize>) -> DnaSequence {
        let start = range.start.min(self.len());
        let end = range.end.min(self.len());
        debug_assert!(start < end, "subsequence range {range:?} is empty");
        Self(self.0[start..end].to_string())
    }

    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }

    pub fn reverse_complement(&self) -> DnaSequence {
        let rc: String = self
            .0
            .bytes()
            .rev()
            .map(|b| complement(b) as char)
            .collect();
        Self(rc)
    }
}

#[inline(always)]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

impl fmt::Display for DnaSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DnaSequence {
    type Error = PlanError;

    fn try_from(text: String) -> Result<Self, PlanError> {
        DnaSequence::new(text)
    }
}

impl From<DnaSequence> for String {
    fn from(seq: DnaSequence) -> String {
        seq.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_new_normalizes_case() {
        let seq = DnaSequence::new("acgtACGT").unwrap();
        assert_eq!(seq.as_str(), "ACGTACGT");
        assert_eq!(seq.len(), 8);
    }

    #[test]
    fn test_new_rejects_empty_and_bad_alphabet() {
        assert_eq!(
            DnaSequence::new("").unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            DnaSequence::new("ACGU").unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            DnaSequence::new("ACG T").unwrap_err().code,
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_subsequence() {
        let seq = DnaSequence::new("ACGTACGT").unwrap();
        assert_eq!(seq.subsequence(2..6).as_str(), "GTAC");
        assert_eq!(seq.subsequence(4..100).as_str(), "ACGT");
    }

    #[test]
    fn test_reverse_complement() {
        let seq = DnaSequence::new("ATGC").unwrap();
        assert_eq!(seq.reverse_complement().as_str(), "GCAT");
    }

    #[test]
    fn test_contains_pattern() {
        let seq = DnaSequence::new("AAGGTCTCAA").unwrap();
        assert!(seq.contains_pattern("GGTCTC"));
        assert!(!seq.contains_pattern("GAATTC"));
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let seq = DnaSequence::new("ACGT").unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "\"ACGT\"");
        let back: DnaSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
        assert!(serde_json::from_str::<DnaSequence>("\"AXGT\"").is_err());
    }

    #[test]
    fn test_from_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, "acgt").unwrap();
        let seq = DnaSequence::from_text_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(seq.as_str(), "ACGTACGT");
    }

    #[test]
    fn test_from_fasta_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">test").unwrap();
        writeln!(file, "ACGTACGT").unwrap();
        let seqs = DnaSequence::from_fasta_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].as_str(), "ACGTACGT");
    }
}
