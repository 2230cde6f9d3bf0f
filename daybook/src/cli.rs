use chrono::{Datelike, NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use xero_api::endpoints::DocumentStatus;

/// Pull sales invoices and credit notes from Xero and export a day book
#[derive(Parser, Debug)]
#[command(name = "daybook", version)]
pub struct Cli {
    /// Reporting year; defaults to the current year
    #[arg(long)]
    pub year: Option<i32>,

    /// Start of the reporting window (inclusive), YYYY-MM-DD.
    /// Defaults to January 1 of the reporting year
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// End of the reporting window (exclusive), YYYY-MM-DD.
    /// Defaults to January 1 of the following year
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Status to include; repeatable. Defaults to AUTHORISED and PAID
    #[arg(long = "status", value_parser = parse_status)]
    pub statuses: Vec<DocumentStatus>,

    /// Contact names to exclude, comma or newline separated
    #[arg(long)]
    pub exclude_contacts: Option<String>,

    /// Directory the workbook is written to
    #[arg(long, env = "DAYBOOK_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Keep tokens in process memory instead of the token file
    /// (requires a configured baseline refresh token)
    #[arg(long)]
    pub session: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}"))
}

fn parse_status(raw: &str) -> Result<DocumentStatus, String> {
    raw.parse().map_err(|e: xero_api::endpoints::StatusParseError| e.to_string())
}

impl Cli {
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let year = self.year();
        let start = self
            .start_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"));
        let end = self
            .end_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid date"));
        (start, end)
    }

    pub fn statuses(&self) -> Vec<DocumentStatus> {
        if self.statuses.is_empty() {
            vec![DocumentStatus::Authorised, DocumentStatus::Paid]
        } else {
            self.statuses.clone()
        }
    }
}
