//! Summary aggregation over the reconciliation outputs

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::bookings::ValidatedBooking;
use crate::config::ReconciliationConfig;
use crate::types::{ObligationAccount, PaymentRecord, PaymentStatus, ResolvedPayment};

/// Aggregate statistics for one reconciliation run.
///
/// Every quantity is a simple deterministic fold over the upstream outputs;
/// no matching logic happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of obligated payers
    pub total_obligated: usize,
    /// Accounts fully paid
    pub paid_count: usize,
    /// Accounts partially paid
    pub underpaid_count: usize,
    /// Accounts with nothing paid
    pub unpaid_count: usize,
    /// (underpaid + unpaid) / total, as a percentage; 0 when nobody is obligated
    pub mismatch_rate: f64,
    /// Fee owed across all obligated payers
    pub membership_expected: BigDecimal,
    /// Total matched payment amount
    pub membership_collected: BigDecimal,
    /// Collected minus expected
    pub membership_difference: BigDecimal,
    /// Number of bookings processed
    pub total_bookings: usize,
    /// Sum of expected booking fees
    pub booking_expected: BigDecimal,
    /// Sum of amounts actually paid for bookings
    pub booking_collected: BigDecimal,
    /// Collected minus expected
    pub booking_difference: BigDecimal,
    /// Bookings flagged for manual review
    pub booking_issue_count: usize,
    /// Payments from known people who are not obligated
    pub non_obligated_payment_count: usize,
    /// Payments that matched no obligated account
    pub unmatched_payment_count: usize,
}

impl Summary {
    /// Fold the outputs of a run into summary statistics
    pub fn from_run(
        accounts: &[ObligationAccount],
        paid_not_selected: &[PaymentRecord],
        unmatched_payments: &[ResolvedPayment],
        bookings: &[ValidatedBooking],
        booking_issues: &[ValidatedBooking],
        config: &ReconciliationConfig,
    ) -> Self {
        let total_obligated = accounts.len();
        let count_status = |status: PaymentStatus| {
            accounts
                .iter()
                .filter(|account| account.status == status)
                .count()
        };
        let paid_count = count_status(PaymentStatus::Paid);
        let underpaid_count = count_status(PaymentStatus::Underpaid);
        let unpaid_count = count_status(PaymentStatus::Unpaid);

        let mismatch_rate = if total_obligated > 0 {
            (underpaid_count + unpaid_count) as f64 / total_obligated as f64 * 100.0
        } else {
            0.0
        };

        let membership_expected = BigDecimal::from(total_obligated as u64) * &config.annual_fee;
        let membership_collected: BigDecimal = accounts
            .iter()
            .map(|account| &account.paid_amount)
            .sum();
        let membership_difference = &membership_collected - &membership_expected;

        let booking_expected: BigDecimal =
            bookings.iter().map(|booking| &booking.expected).sum();
        let booking_collected: BigDecimal =
            bookings.iter().map(|booking| &booking.amount_paid).sum();
        let booking_difference = &booking_collected - &booking_expected;

        Self {
            total_obligated,
            paid_count,
            underpaid_count,
            unpaid_count,
            mismatch_rate,
            membership_expected,
            membership_collected,
            membership_difference,
            total_bookings: bookings.len(),
            booking_expected,
            booking_collected,
            booking_difference,
            booking_issue_count: booking_issues.len(),
            non_obligated_payment_count: paid_not_selected.len(),
            unmatched_payment_count: unmatched_payments.len(),
        }
    }

    /// Render the human-readable report.
    ///
    /// The generation timestamp is supplied by the caller so the engine
    /// output itself stays a pure function of its inputs.
    pub fn render(&self, generated_at: NaiveDateTime) -> String {
        format!(
            "Club Membership & Bookings Reconciliation\n\
             Generated: {generated}\n\
             \n\
             MEMBERSHIP SUMMARY:\n\
             Total obligated members: {total}\n\
             - Paid in full: {paid}\n\
             - Underpaid: {underpaid}\n\
             - Unpaid: {unpaid}\n\
             Mismatch rate: {rate:.1}%\n\
             \n\
             Membership revenue:\n\
             - Expected: \u{a3}{membership_expected}\n\
             - Collected: \u{a3}{membership_collected}\n\
             - Difference: \u{a3}{membership_difference}\n\
             \n\
             FACILITY BOOKINGS:\n\
             Total bookings: {bookings}\n\
             - Expected: \u{a3}{booking_expected}\n\
             - Collected: \u{a3}{booking_collected}\n\
             - Difference: \u{a3}{booking_difference}\n\
             - Bookings with issues: {issues}\n\
             \n\
             ADDITIONAL FINDINGS:\n\
             - Payments from non-obligated payers: {non_obligated}\n\
             - Unmatched payments (need review): {unmatched}\n",
            generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
            total = self.total_obligated,
            paid = self.paid_count,
            underpaid = self.underpaid_count,
            unpaid = self.unpaid_count,
            rate = self.mismatch_rate,
            membership_expected = fmt_money(&self.membership_expected),
            membership_collected = fmt_money(&self.membership_collected),
            membership_difference = fmt_money(&self.membership_difference),
            bookings = self.total_bookings,
            booking_expected = fmt_money(&self.booking_expected),
            booking_collected = fmt_money(&self.booking_collected),
            booking_difference = fmt_money(&self.booking_difference),
            issues = self.booking_issue_count,
            non_obligated = self.non_obligated_payment_count,
            unmatched = self.unmatched_payment_count,
        )
    }
}

fn fmt_money(amount: &BigDecimal) -> String {
    amount
        .with_scale_round(2, RoundingMode::HalfUp)
        .to_string()
}
