//! Basic reconciliation walkthrough

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use reconcile_core::{
    BookingRecord, Payer, PaymentRecord, ReconciliationConfig, ReconciliationEngine,
};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Reconcile Core - Basic Reconciliation Example\n");

    // 1. The roster: two obligated payers, one social member.
    let payers = vec![
        Payer::new(
            "M1".to_string(),
            "John Smith".to_string(),
            "First Team".to_string(),
            true,
        ),
        Payer::new(
            "M2".to_string(),
            "Maria Garcia".to_string(),
            "First Team".to_string(),
            true,
        ),
        Payer::new(
            "M3".to_string(),
            "Li Wei".to_string(),
            "Social".to_string(),
            false,
        ),
    ];

    // 2. Payments: an installment by id, a misspelled installment caught by
    //    the fuzzy pass, a social member's payment, and a stranger's.
    let payments = vec![
        payment(Some("M1"), "John Smith", "50", 1),
        payment(None, "Jon Smyth", "70", 8),
        payment(None, "Li Wei", "120", 9),
        payment(None, "Sam Stranger", "60", 10),
    ];

    // 3. Bookings: one paid in full, one underpaid.
    let bookings = vec![
        booking("B1", "Casual Hirer", "2", "10"),
        booking("B2", "Casual Hirer", "3", "10"),
    ];

    let engine = ReconciliationEngine::new(ReconciliationConfig::default());
    let output = engine.reconcile(&payers, &payments, &bookings);

    for account in &output.accounts {
        println!(
            "  {} {} paid {} ({:?}, outstanding {})",
            account.id, account.display_name, account.paid_amount, account.status,
            account.outstanding
        );
    }
    println!();

    for suggestion in &output.fuzzy_suggestions {
        println!(
            "  suggestion: '{}' looks like '{}'",
            suggestion.entered_name, suggestion.suggested_name
        );
    }
    println!();

    println!("{}", output.summary.render(Utc::now().naive_utc()));
    Ok(())
}

fn payment(id: Option<&str>, name: &str, amount: &str, day: u32) -> PaymentRecord {
    PaymentRecord {
        id: id.map(String::from),
        display_name: name.to_string(),
        amount: BigDecimal::from_str(amount).unwrap(),
        payment_date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
    }
}

fn booking(id: &str, name: &str, hours: &str, paid: &str) -> BookingRecord {
    BookingRecord {
        booking_id: id.to_string(),
        display_name: name.to_string(),
        start_time: NaiveDate::from_ymd_opt(2025, 10, 4)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
        hours: BigDecimal::from_str(hours).unwrap(),
        amount_paid: BigDecimal::from_str(paid).unwrap(),
    }
}
