pub mod dna;
pub mod qual;
