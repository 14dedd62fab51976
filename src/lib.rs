//! # Reconciliation Core
//!
//! Pairs bank transactions with supporting documents (invoices and
//! receipts) using a small set of hand-tuned heuristics.
//!
//! ## Features
//!
//! - **Reference matching**: normalized payment references pair records directly
//! - **Heuristic scoring**: amount (+3), counterparty name (+2) and date proximity (+1)
//! - **Greedy assignment**: each record is used at most once per run
//! - **Graceful degradation**: missing or malformed fields lower the score, never abort
//! - **Query summaries**: a restricted view of a run for downstream question answering
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{Attachment, Reconciler, Transaction};
//! use bigdecimal::BigDecimal;
//!
//! let transactions = vec![Transaction::new("t1", BigDecimal::from(-100))
//!     .with_contact("Jane Doe")
//!     .with_date("2024-01-10")];
//! let attachments = vec![Attachment::new("a1")
//!     .with_field("total_amount", 100)
//!     .with_field("supplier", "Jane Doe Consulting")
//!     .with_field("invoice_date", "2024-01-12")];
//!
//! let report = Reconciler::default().reconcile(&transactions, &attachments);
//! assert_eq!(report.attachment_for("t1").map(String::as_str), Some("a1"));
//! ```

pub mod config;
pub mod matching;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use matching::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
