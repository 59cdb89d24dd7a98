//! # Reconcile Core
//!
//! A reconciliation library for club membership fee payments and
//! pay-per-use facility bookings, checked against a roster of obligated
//! payers.
//!
//! ## Features
//!
//! - **Identity resolution**: exact identifier matching with a fuzzy-name
//!   fallback over a pluggable similarity metric
//! - **Balance aggregation**: per-payer accounts accumulated across any
//!   number of installments, with derived payment status
//! - **Non-member classification**: separates payments from known but
//!   non-obligated people from payments nobody can be matched to
//! - **Booking validation**: per-booking fee sufficiency checks against a
//!   fixed hourly rate
//! - **Summary reporting**: aggregate statistics and a human-readable
//!   report over a single consistent snapshot
//! - **CSV wrappers**: thin readers and writers around the engine's
//!   in-memory collections
//!
//! ## Quick Start
//!
//! ```rust
//! use reconcile_core::{Payer, PaymentRecord, ReconciliationConfig, ReconciliationEngine};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let payers = vec![Payer::new(
//!     "M1".to_string(),
//!     "John Smith".to_string(),
//!     "First Team".to_string(),
//!     true,
//! )];
//! let payments = vec![PaymentRecord {
//!     id: Some("M1".to_string()),
//!     display_name: "John Smith".to_string(),
//!     amount: BigDecimal::from(120),
//!     payment_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
//! }];
//!
//! let engine = ReconciliationEngine::new(ReconciliationConfig::default());
//! let output = engine.reconcile(&payers, &payments, &[]);
//! assert_eq!(output.summary.paid_count, 1);
//! ```

pub mod bookings;
pub mod config;
pub mod io;
pub mod reconciliation;
pub mod report;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use bookings::*;
pub use config::*;
pub use reconciliation::*;
pub use report::*;
pub use similarity::*;
pub use types::*;
