//! Command-line wrapper around the reconciliation engine

use std::fs::{self, File};
use std::path::PathBuf;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::Local;
use clap::Parser;
use log::info;
use reconcile_core::{
    io::csv::{load_bookings, load_payers, load_payments, write_table},
    ReconcileResult, ReconciliationConfig, ReconciliationEngine,
};

#[derive(Parser, Debug)]
#[command(
    name = "reconcile",
    version,
    about = "Club membership and bookings reconciliation"
)]
struct Cli {
    /// Roster CSV (member_id, full_name, group, obligated)
    #[arg(long)]
    members: PathBuf,

    /// Membership payments CSV (member_id, full_name, amount, payment_date)
    #[arg(long)]
    payments: PathBuf,

    /// Facility bookings CSV (booking_id, full_name, booking_start, hours, amount_paid)
    #[arg(long)]
    bookings: PathBuf,

    /// Directory the report files are written into
    #[arg(long, default_value = "reports")]
    out_dir: PathBuf,

    /// Annual membership fee
    #[arg(long, default_value = "120", value_parser = parse_decimal)]
    annual_fee: BigDecimal,

    /// Hourly facility rate
    #[arg(long, default_value = "5", value_parser = parse_decimal)]
    hourly_rate: BigDecimal,

    /// Inclusive fuzzy-match cutoff, in [0, 1]
    #[arg(long, default_value_t = 0.86)]
    fuzzy_cutoff: f64,
}

fn parse_decimal(raw: &str) -> Result<BigDecimal, String> {
    BigDecimal::from_str(raw).map_err(|err| err.to_string())
}

fn main() -> ReconcileResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ReconciliationConfig::new(cli.annual_fee, cli.hourly_rate, cli.fuzzy_cutoff);
    config.validate()?;

    info!("loading input files");
    let payers = load_payers(File::open(&cli.members)?)?;
    let payments = load_payments(File::open(&cli.payments)?)?;
    let bookings = load_bookings(File::open(&cli.bookings)?)?;

    let engine = ReconciliationEngine::new(config);
    let output = engine.reconcile(&payers, &payments, &bookings);

    fs::create_dir_all(&cli.out_dir)?;
    write_table(
        File::create(cli.out_dir.join("membership_status.csv"))?,
        &output.accounts,
    )?;
    write_table(
        File::create(cli.out_dir.join("payments_resolved.csv"))?,
        &output.resolved_payments,
    )?;
    write_table(
        File::create(cli.out_dir.join("fuzzy_suggestions.csv"))?,
        &output.fuzzy_suggestions,
    )?;
    write_table(
        File::create(cli.out_dir.join("paid_not_selected.csv"))?,
        &output.paid_not_selected,
    )?;
    write_table(
        File::create(cli.out_dir.join("unmatched_payments.csv"))?,
        &output.unmatched_payments,
    )?;
    write_table(
        File::create(cli.out_dir.join("bookings_all.csv"))?,
        &output.bookings,
    )?;
    write_table(
        File::create(cli.out_dir.join("booking_issues.csv"))?,
        &output.booking_issues,
    )?;

    let report = output.summary.render(Local::now().naive_local());
    fs::write(cli.out_dir.join("summary.txt"), &report)?;

    println!("{report}");
    info!("reports written to {}", cli.out_dir.display());

    Ok(())
}
