//! Reconciliation engine for membership payments and facility bookings
//!
//! The engine is a pure batch computation: it takes the three input
//! collections plus the run configuration and produces every output
//! collection and the summary from one consistent snapshot. Re-running with
//! identical, identically-ordered inputs yields identical outputs; input row
//! order is part of the contract (it drives fuzzy tie-breaks and
//! last-payment-date attribution).

mod classify;
mod normalize;
mod resolver;

pub use normalize::normalize_name;

use log::info;
use serde::{Deserialize, Serialize};

use crate::bookings::{booking_issues, validate_bookings, ValidatedBooking};
use crate::config::ReconciliationConfig;
use crate::report::Summary;
use crate::similarity::{JaroWinkler, NameSimilarity};
use crate::types::{
    BookingRecord, FuzzySuggestion, ObligationAccount, Payer, PaymentRecord, ResolvedPayment,
};

/// Complete result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutput {
    /// One finalized account per obligated payer, in roster order
    pub accounts: Vec<ObligationAccount>,
    /// Audit trail: one record per input payment, in input order
    pub resolved_payments: Vec<ResolvedPayment>,
    /// Name corrections surfaced by the fuzzy pass
    pub fuzzy_suggestions: Vec<FuzzySuggestion>,
    /// Payments from known people who are not on the obligated list
    pub paid_not_selected: Vec<PaymentRecord>,
    /// Payments that matched no obligated account. May overlap with
    /// `paid_not_selected`; the two views are kept as-is, not deduplicated.
    pub unmatched_payments: Vec<ResolvedPayment>,
    /// Every booking, annotated with expected fee and issue flags
    pub bookings: Vec<ValidatedBooking>,
    /// The subset of bookings that are underpaid or missing payment
    pub booking_issues: Vec<ValidatedBooking>,
    /// Aggregate statistics over all of the above
    pub summary: Summary,
}

/// Reconciliation engine tying identity resolution, balance aggregation,
/// booking validation and summary reporting together
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    similarity: Box<dyn NameSimilarity>,
}

impl ReconciliationEngine {
    /// Create an engine with the default Jaro-Winkler name similarity
    pub fn new(config: ReconciliationConfig) -> Self {
        Self::with_similarity(config, Box::new(JaroWinkler))
    }

    /// Create an engine with a custom similarity metric
    pub fn with_similarity(
        config: ReconciliationConfig,
        similarity: Box<dyn NameSimilarity>,
    ) -> Self {
        Self { config, similarity }
    }

    /// The configuration this engine runs with
    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Run a full batch reconciliation over the three input collections.
    ///
    /// Absence of a match is a normal classification outcome, never an
    /// error, so the run itself cannot fail.
    pub fn reconcile(
        &self,
        payers: &[Payer],
        payments: &[PaymentRecord],
        bookings: &[BookingRecord],
    ) -> ReconciliationOutput {
        let fee = &self.config.annual_fee;

        let obligated: Vec<&Payer> = payers.iter().filter(|payer| payer.is_obligated).collect();
        let mut accounts: Vec<ObligationAccount> = obligated
            .iter()
            .map(|payer| ObligationAccount::new(payer, fee))
            .collect();

        // Static snapshot of the fuzzy-match pool, index-aligned with the
        // accounts, taken before either matching pass.
        let name_pool: Vec<String> = obligated
            .iter()
            .map(|payer| payer.normalized_name.clone())
            .collect();

        info!(
            "reconciling {} payments against {} obligated payers ({} on roster)",
            payments.len(),
            accounts.len(),
            payers.len()
        );

        let resolution = resolver::resolve_payments(
            &mut accounts,
            &name_pool,
            payments,
            fee,
            self.config.fuzzy_cutoff,
            self.similarity.as_ref(),
        );

        // Accumulate-then-classify: status is derived once from the final
        // totals, regardless of how many installments were matched.
        for account in &mut accounts {
            account.finalize(fee);
        }

        let paid_not_selected = classify::paid_but_not_selected(payers, payments, &resolution.consumed);
        let unmatched_payments = classify::unmatched_payments(&resolution.resolved);

        let validated = validate_bookings(bookings, &self.config.hourly_rate);
        let issues = booking_issues(&validated);

        let matched = resolution.consumed.iter().filter(|consumed| **consumed).count();
        info!(
            "matched {}/{} payments, {} fuzzy suggestions, {} booking issues",
            matched,
            payments.len(),
            resolution.suggestions.len(),
            issues.len()
        );

        let summary = Summary::from_run(
            &accounts,
            &paid_not_selected,
            &unmatched_payments,
            &validated,
            &issues,
            &self.config,
        );

        ReconciliationOutput {
            accounts,
            resolved_payments: resolution.resolved,
            fuzzy_suggestions: resolution.suggestions,
            paid_not_selected,
            unmatched_payments,
            bookings: validated,
            booking_issues: issues,
            summary,
        }
    }
}
