//! Stateless per-record validation of facility bookings
//!
//! Bookings are self-contained: no identity resolution is involved, each
//! record is judged purely against the hourly rate.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::BookingRecord;

/// Tolerance absorbing floating-point rounding in imported amounts
fn payment_epsilon() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// A booking annotated with its expected fee and issue flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedBooking {
    /// Unique booking reference
    pub booking_id: String,
    /// Name the booking was made under
    pub display_name: String,
    /// Start of the booked slot
    pub start_time: NaiveDateTime,
    /// Booked duration in hours
    pub hours: BigDecimal,
    /// Amount actually paid
    pub amount_paid: BigDecimal,
    /// Fee owed for the slot: hours times the hourly rate
    pub expected: BigDecimal,
    /// Paid noticeably less than expected (beyond the rounding tolerance)
    pub underpaid: bool,
    /// Nothing paid at all
    pub missing_payment: bool,
}

impl ValidatedBooking {
    /// Whether this booking needs manual review
    pub fn has_issue(&self) -> bool {
        self.underpaid || self.missing_payment
    }
}

/// Annotate every booking with its expected fee and issue flags.
///
/// `underpaid` holds iff `amount_paid < hours * rate - 0.01`;
/// `missing_payment` holds iff `amount_paid <= 0`.
pub fn validate_bookings(
    records: &[BookingRecord],
    hourly_rate: &BigDecimal,
) -> Vec<ValidatedBooking> {
    let epsilon = payment_epsilon();

    records
        .iter()
        .map(|booking| {
            let expected = &booking.hours * hourly_rate;
            let underpaid = booking.amount_paid < &expected - &epsilon;
            let missing_payment = booking.amount_paid <= BigDecimal::from(0);

            ValidatedBooking {
                booking_id: booking.booking_id.clone(),
                display_name: booking.display_name.clone(),
                start_time: booking.start_time,
                hours: booking.hours.clone(),
                amount_paid: booking.amount_paid.clone(),
                expected,
                underpaid,
                missing_payment,
            }
        })
        .collect()
}

/// The subset of bookings flagged for manual review
pub fn booking_issues(bookings: &[ValidatedBooking]) -> Vec<ValidatedBooking> {
    bookings
        .iter()
        .filter(|booking| booking.has_issue())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn booking(id: &str, hours: &str, paid: &str) -> BookingRecord {
        BookingRecord {
            booking_id: id.to_string(),
            display_name: "Casual Hirer".to_string(),
            start_time: NaiveDate::from_ymd_opt(2025, 10, 4)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            hours: BigDecimal::from_str(hours).unwrap(),
            amount_paid: BigDecimal::from_str(paid).unwrap(),
        }
    }

    #[test]
    fn test_underpaid_booking_is_flagged() {
        let rate = BigDecimal::from(5);
        let validated = validate_bookings(&[booking("B1", "3", "10")], &rate);

        assert_eq!(validated[0].expected, BigDecimal::from(15));
        assert!(validated[0].underpaid);
        assert!(!validated[0].missing_payment);
        assert_eq!(booking_issues(&validated).len(), 1);
    }

    #[test]
    fn test_shortfall_within_tolerance_is_accepted() {
        let rate = BigDecimal::from(5);
        // Exactly epsilon under the expected 15 is not underpaid; a cent
        // beyond that is.
        let validated = validate_bookings(
            &[booking("B1", "3", "14.99"), booking("B2", "3", "14.98")],
            &rate,
        );

        assert!(!validated[0].underpaid);
        assert!(validated[1].underpaid);
    }

    #[test]
    fn test_zero_and_negative_amounts_are_missing_payment() {
        let rate = BigDecimal::from(5);
        let validated = validate_bookings(
            &[booking("B1", "2", "0"), booking("B2", "2", "-5")],
            &rate,
        );

        assert!(validated[0].missing_payment);
        assert!(validated[1].missing_payment);
        assert_eq!(booking_issues(&validated).len(), 2);
    }

    #[test]
    fn test_fully_paid_booking_has_no_issue() {
        let rate = BigDecimal::from(5);
        let validated = validate_bookings(&[booking("B1", "1.5", "7.50")], &rate);

        assert_eq!(validated[0].expected, BigDecimal::from_str("7.50").unwrap());
        assert!(!validated[0].has_issue());
        assert!(booking_issues(&validated).is_empty());
    }
}
