use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// A Type IIS restriction enzyme: cuts outside its recognition site, leaving
/// a short single-stranded overhang. These drive Golden Gate assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeIisEnzyme {
    pub name: String,
    pub site: String,
    /// Bases between the recognition site and the cut position.
    pub spacer: usize,
    /// Length of the overhang the cut leaves behind.
    pub overhang: usize,
}

#[derive(Clone, Debug)]
pub struct Enzymes {
    enzymes: Vec<TypeIisEnzyme>,
}

impl Enzymes {
    fn new(json_text: &str) -> Result<Self> {
        let enzymes: Vec<TypeIisEnzyme> =
            serde_json::from_str(json_text).context("could not parse enzyme table")?;
        Ok(Self { enzymes })
    }

    pub fn all(&self) -> &[TypeIisEnzyme] {
        &self.enzymes
    }

    pub fn by_name(&self, name: &str) -> Option<&TypeIisEnzyme> {
        self.enzymes.iter().find(|e| e.name == name)
    }
}

impl Default for Enzymes {
    fn default() -> Self {
        Enzymes::new(BUILTIN_ENZYMES_JSON).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENZYMES;

    #[test]
    fn test_builtin_table_loads() {
        let bsai = ENZYMES.by_name("BsaI").unwrap();
        assert_eq!(bsai.site, "GGTCTC");
        assert_eq!(bsai.overhang, 4);
    }

    #[test]
    fn test_unknown_enzyme_is_none() {
        assert!(ENZYMES.by_name("EcoRI").is_none());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Enzymes::new("{not json").is_err());
    }
}
