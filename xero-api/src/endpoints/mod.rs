pub mod credit_notes;
pub mod invoices;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Document status shared by invoices and credit notes.
///
/// Closed set: an unknown wire value fails deserialization loudly rather
/// than being silently bucketed.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Draft,
    Submitted,
    Deleted,
    Authorised,
    Paid,
    Voided,
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("DRAFT"),
            Self::Submitted => f.write_str("SUBMITTED"),
            Self::Deleted => f.write_str("DELETED"),
            Self::Authorised => f.write_str("AUTHORISED"),
            Self::Paid => f.write_str("PAID"),
            Self::Voided => f.write_str("VOIDED"),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "DELETED" => Ok(Self::Deleted),
            "AUTHORISED" => Ok(Self::Authorised),
            "PAID" => Ok(Self::Paid),
            "VOIDED" => Ok(Self::Voided),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError(String);

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid document status '{}': expected DRAFT, SUBMITTED, DELETED, AUTHORISED, PAID, or VOIDED",
            self.0
        )
    }
}

impl std::error::Error for StatusParseError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    pub name: Option<String>,
}

/// A payment applied to a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub date: Option<String>,
    pub date_string: Option<String>,
    pub amount: Option<f64>,
}

impl Payment {
    pub fn effective_date(&self) -> Option<NaiveDate> {
        parse_first([self.date_string.as_deref(), self.date.as_deref()])
    }
}

/// A credit allocation against a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Allocation {
    pub applied_date: Option<String>,
    pub amount: Option<f64>,
}

impl Allocation {
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.applied_date.as_deref().and_then(parse_xero_date)
    }
}

/// Parse a date in either of Xero's wire formats: the ISO `DateString`
/// variants or the legacy `/Date(1436839738391+0000)/` envelope.
pub fn parse_xero_date(raw: &str) -> Option<NaiveDate> {
    if let Some(rest) = raw.strip_prefix("/Date(") {
        let millis: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '-')
            .collect();
        let millis: i64 = millis.parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// First parseable date among the candidates, in preference order
pub(crate) fn parse_first<const N: usize>(candidates: [Option<&str>; N]) -> Option<NaiveDate> {
    candidates.into_iter().flatten().find_map(parse_xero_date)
}
