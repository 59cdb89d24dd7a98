//! CSV readers for the three input tables and writers for the output tables
//!
//! Expected input headers:
//! members: `member_id,full_name,group,obligated`
//! payments: `member_id,full_name,amount,payment_date`
//! bookings: `booking_id,full_name,booking_start,hours,amount_paid`

use std::io::{Read, Write};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::types::{BookingRecord, Payer, PaymentRecord, ReconcileError, ReconcileResult};

#[derive(Debug, Deserialize)]
struct PayerRow {
    member_id: String,
    full_name: String,
    #[serde(default)]
    group: Option<String>,
    obligated: String,
}

#[derive(Debug, Deserialize)]
struct PaymentRow {
    member_id: Option<String>,
    full_name: Option<String>,
    amount: String,
    payment_date: String,
}

#[derive(Debug, Deserialize)]
struct BookingRow {
    booking_id: String,
    full_name: Option<String>,
    booking_start: String,
    hours: String,
    amount_paid: String,
}

/// Load the payer roster
pub fn load_payers<R: Read>(reader: R) -> ReconcileResult<Vec<Payer>> {
    let mut rdr = Reader::from_reader(reader);
    let mut payers = Vec::new();

    for row in rdr.deserialize::<PayerRow>() {
        let row = row?;
        payers.push(Payer::new(
            row.member_id,
            row.full_name,
            row.group.unwrap_or_default(),
            parse_flag(&row.obligated),
        ));
    }

    Ok(payers)
}

/// Load the membership fee payments
pub fn load_payments<R: Read>(reader: R) -> ReconcileResult<Vec<PaymentRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let mut payments = Vec::new();

    for row in rdr.deserialize::<PaymentRow>() {
        let row = row?;
        payments.push(PaymentRecord {
            id: row.member_id.filter(|id| !id.trim().is_empty()),
            display_name: row.full_name.unwrap_or_default(),
            amount: parse_amount("amount", &row.amount)?,
            payment_date: parse_date("payment_date", &row.payment_date)?,
        });
    }

    Ok(payments)
}

/// Load the facility bookings
pub fn load_bookings<R: Read>(reader: R) -> ReconcileResult<Vec<BookingRecord>> {
    let mut rdr = Reader::from_reader(reader);
    let mut bookings = Vec::new();

    for row in rdr.deserialize::<BookingRow>() {
        let row = row?;
        bookings.push(BookingRecord {
            booking_id: row.booking_id,
            display_name: row.full_name.unwrap_or_default(),
            start_time: parse_datetime("booking_start", &row.booking_start)?,
            hours: parse_amount("hours", &row.hours)?,
            amount_paid: parse_amount("amount_paid", &row.amount_paid)?,
        });
    }

    Ok(bookings)
}

/// Write any of the output tables, headers taken from the row type
pub fn write_table<W: Write, T: Serialize>(writer: W, rows: &[T]) -> ReconcileResult<()> {
    let mut wtr = Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Boolean-like roster flag: yes/true/1 in any case, anything else is false
fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("yes") || raw.eq_ignore_ascii_case("true") || raw == "1"
}

fn parse_amount(field: &str, raw: &str) -> ReconcileResult<BigDecimal> {
    BigDecimal::from_str(raw.trim())
        .map_err(|err| ReconcileError::Parse(format!("invalid {field} value '{raw}': {err}")))
}

fn parse_date(field: &str, raw: &str) -> ReconcileResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| ReconcileError::Parse(format!("invalid {field} value '{raw}': {err}")))
}

fn parse_datetime(field: &str, raw: &str) -> ReconcileResult<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .map_err(|err| ReconcileError::Parse(format!("invalid {field} value '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_payers_derives_normalized_names() {
        let data = "member_id,full_name,group,obligated\n\
                    M1,  John SMITH ,First Team,Yes\n\
                    M2,Maria Garcia,Second Team,No\n";

        let payers = load_payers(data.as_bytes()).unwrap();
        assert_eq!(payers.len(), 2);
        assert!(payers[0].is_obligated);
        assert_eq!(payers[0].normalized_name, "john smith");
        assert!(!payers[1].is_obligated);
    }

    #[test]
    fn test_load_payments_treats_blank_id_as_absent() {
        let data = "member_id,full_name,amount,payment_date\n\
                    ,Jon Smyth,70,2025-09-02\n\
                    M1,John Smith,50,2025-09-01\n";

        let payments = load_payments(data.as_bytes()).unwrap();
        assert_eq!(payments[0].id, None);
        assert_eq!(payments[1].id.as_deref(), Some("M1"));
        assert_eq!(payments[1].amount, BigDecimal::from(50));
    }

    #[test]
    fn test_malformed_amount_is_fatal() {
        let data = "member_id,full_name,amount,payment_date\n\
                    M1,John Smith,twelve,2025-09-01\n";

        let err = load_payments(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReconcileError::Parse(_)));
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let data = "member_id,full_name,amount,payment_date\n\
                    M1,John Smith,50,01/09/2025\n";

        let err = load_payments(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReconcileError::Parse(_)));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let data = "member_id,full_name\nM1,John Smith\n";

        let err = load_payments(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReconcileError::Csv(_)));
    }

    #[test]
    fn test_load_bookings_accepts_both_datetime_shapes() {
        let data = "booking_id,full_name,booking_start,hours,amount_paid\n\
                    B1,Casual Hirer,2025-10-04 18:00:00,3,15\n\
                    B2,Casual Hirer,2025-10-05 09:30,1.5,7.50\n";

        let bookings = load_bookings(data.as_bytes()).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[1].hours, BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_write_table_emits_headers_from_the_row_type() {
        let payers = load_payers(
            "member_id,full_name,group,obligated\nM1,John Smith,First Team,Yes\n".as_bytes(),
        )
        .unwrap();

        let mut buffer = Vec::new();
        write_table(&mut buffer, &payers).unwrap();
        let written = String::from_utf8(buffer).unwrap();

        assert!(written.starts_with("id,display_name,group,is_obligated,normalized_name"));
        assert!(written.contains("M1,John Smith,First Team,true,john smith"));
    }
}
