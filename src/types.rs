//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reconciliation::normalize_name;

/// Payment status of an obligated payer, derived from the accumulated total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Accumulated payments cover the full fee
    Paid,
    /// Some payment received, but less than the fee
    Underpaid,
    /// No payment received at all
    Unpaid,
}

impl PaymentStatus {
    /// Classify a final accumulated amount against the fixed fee.
    ///
    /// Paid iff `paid_amount >= fee`; Underpaid iff `0 < paid_amount < fee`;
    /// Unpaid iff `paid_amount = 0`.
    pub fn classify(paid_amount: &BigDecimal, fee: &BigDecimal) -> Self {
        if paid_amount >= fee {
            PaymentStatus::Paid
        } else if *paid_amount > BigDecimal::from(0) {
            PaymentStatus::Underpaid
        } else {
            PaymentStatus::Unpaid
        }
    }
}

/// How (or whether) a payment was resolved to an obligated payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    /// Matched by identifier in the exact pass
    ExactId,
    /// Matched by name similarity in the fuzzy pass
    FuzzyName,
    /// Matched in neither pass
    Unmatched,
}

/// A person on the roster who may owe the membership fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    /// Unique identifier within the roster
    pub id: String,
    /// Display name as entered in the roster
    pub display_name: String,
    /// Group or team the payer belongs to
    pub group: String,
    /// Whether this payer owes the annual fee
    pub is_obligated: bool,
    /// Normalized comparison key derived from the display name.
    /// Used only for matching, never as a persisted identity.
    pub normalized_name: String,
}

impl Payer {
    /// Create a payer, deriving the normalized comparison key
    pub fn new(id: String, display_name: String, group: String, is_obligated: bool) -> Self {
        let normalized_name = normalize_name(Some(&display_name));
        Self {
            id,
            display_name,
            group,
            is_obligated,
            normalized_name,
        }
    }
}

/// Running balance of one obligated payer
///
/// Created for every payer with `is_obligated`, mutated as matching payments
/// are folded in, and finalized once all payments have been processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligationAccount {
    /// Payer identifier
    pub id: String,
    /// Payer display name
    pub display_name: String,
    /// Payer group
    pub group: String,
    /// Total matched payment amount accumulated so far
    pub paid_amount: BigDecimal,
    /// Payment status, valid after finalization
    pub status: PaymentStatus,
    /// Remaining amount owed, never negative
    pub outstanding: BigDecimal,
    /// Date of the most recently processed matching payment
    pub last_payment_date: Option<NaiveDate>,
}

impl ObligationAccount {
    /// Open an account for an obligated payer with nothing paid yet
    pub fn new(payer: &Payer, fee: &BigDecimal) -> Self {
        Self {
            id: payer.id.clone(),
            display_name: payer.display_name.clone(),
            group: payer.group.clone(),
            paid_amount: BigDecimal::from(0),
            status: PaymentStatus::Unpaid,
            outstanding: fee.clone(),
            last_payment_date: None,
        }
    }

    /// Fold a matched payment into the account.
    ///
    /// The payment date overwrites `last_payment_date` in processing order,
    /// not chronological order.
    pub fn record_payment(&mut self, amount: &BigDecimal, date: NaiveDate, fee: &BigDecimal) {
        self.paid_amount += amount;
        let remaining = fee - &self.paid_amount;
        self.outstanding = if remaining < BigDecimal::from(0) {
            BigDecimal::from(0)
        } else {
            remaining
        };
        self.last_payment_date = Some(date);
    }

    /// Compute the final status from the accumulated total.
    ///
    /// Must run after all payments have been folded in, so the status
    /// reflects the true total across any number of installments.
    pub fn finalize(&mut self, fee: &BigDecimal) {
        self.status = PaymentStatus::classify(&self.paid_amount, fee);
    }
}

/// A single membership fee payment as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payer identifier, if the payment carried one
    pub id: Option<String>,
    /// Name as entered on the payment
    pub display_name: String,
    /// Amount paid
    pub amount: BigDecimal,
    /// Date of the payment
    pub payment_date: NaiveDate,
}

/// A payment plus the outcome of identity resolution: the audit trail.
///
/// One per input payment, created during resolution and never mutated
/// afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPayment {
    /// Identifier carried on the payment, if any
    pub id: Option<String>,
    /// Name as entered on the payment
    pub display_name: String,
    /// Amount paid
    pub amount: BigDecimal,
    /// Date of the payment
    pub payment_date: NaiveDate,
    /// Identifier of the obligated payer this payment was matched to
    pub resolved_payer_id: Option<String>,
    /// How the match was made
    pub match_type: MatchType,
}

impl ResolvedPayment {
    /// Start the audit record for a payment, before any matching
    pub fn unmatched(payment: &PaymentRecord) -> Self {
        Self {
            id: payment.id.clone(),
            display_name: payment.display_name.clone(),
            amount: payment.amount.clone(),
            payment_date: payment.payment_date,
            resolved_payer_id: None,
            match_type: MatchType::Unmatched,
        }
    }
}

/// A name correction surfaced by the fuzzy pass, for manual review.
///
/// Emitted only when the matched name differs from the entered name;
/// both sides carry the original display strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySuggestion {
    /// Name as entered on the payment
    pub entered_name: String,
    /// Roster name it was matched to
    pub suggested_name: String,
}

/// A pay-per-use facility booking as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Unique booking reference
    pub booking_id: String,
    /// Name the booking was made under
    pub display_name: String,
    /// Start of the booked slot
    pub start_time: NaiveDateTime,
    /// Booked duration in hours
    pub hours: BigDecimal,
    /// Amount actually paid for the booking
    pub amount_paid: BigDecimal,
}

/// Errors that can occur while loading inputs or configuring a run
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
