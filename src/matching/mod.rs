//! Matching engine: normalization, extraction, scoring and selection

pub mod extract;
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use extract::*;
pub use matcher::*;
pub use normalize::*;
pub use scoring::*;
