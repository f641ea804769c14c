use enzymes::Enzymes;
use lazy_static::lazy_static;

pub mod assembly_method;
pub mod assembly_station;
pub mod commercial_offer;
pub mod comparator;
pub mod constraints;
pub mod enzymes;
pub mod error;
pub mod melting_temperature;
pub mod network;
pub mod quote;
pub mod reports;
pub mod segment_selector;
pub mod sequence;
pub mod supplier;

#[cfg(test)]
pub(crate) mod test_util;

lazy_static! {
    // Type IIS enzymes available to Golden Gate assembly methods
    pub static ref ENZYMES: Enzymes = Enzymes::default();
}
