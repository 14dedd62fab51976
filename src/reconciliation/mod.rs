//! Reconciliation runs for bank transactions and supporting documents
//!
//! A run walks one collection in input order, asks the matcher for the best
//! counterpart among records not yet consumed, and records each pair in a
//! fresh [`MatchState`]. Whatever is left over on either side is reported as
//! unmatched.

pub mod engine;
pub mod state;
pub mod summary;

pub use engine::*;
pub use state::*;
pub use summary::*;
