use std::collections::HashSet;

use anyhow::Result;
use chrono::NaiveDate;
use daybook_auth::CredentialManager;
use xero_api::endpoints::credit_notes::{CreditNote, ListCreditNotes};
use xero_api::endpoints::invoices::{Invoice, ListInvoices};
use xero_api::endpoints::DocumentStatus;
use xero_api::Client;

/// Hard cap on pages fetched per resource
const PAGE_LIMIT: u32 = 500;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DocKind {
    Invoice,
    CreditNote,
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoice => f.write_str("INVOICE"),
            Self::CreditNote => f.write_str("CREDIT_NOTE"),
        }
    }
}

/// One normalized day-book row, shared by both document kinds
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub doc_kind: DocKind,
    pub doc_type: Option<String>,
    pub number: Option<String>,
    pub contact: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
    pub currency: Option<String>,
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    pub total: Option<f64>,
    pub amount_paid: Option<f64>,
    pub amount_due: Option<f64>,
    pub amount_credited: Option<f64>,
}

pub fn tidy_invoice(invoice: &Invoice) -> DocumentRow {
    DocumentRow {
        doc_kind: DocKind::Invoice,
        doc_type: invoice.invoice_type.map(|t| t.to_string()),
        number: invoice.invoice_number.clone(),
        contact: invoice.contact_name().map(str::to_string),
        date: invoice.issue_date(),
        due_date: invoice.due_date(),
        payment_date: invoice.latest_payment_date(),
        status: invoice.status,
        currency: invoice.currency_code.clone(),
        subtotal: invoice.sub_total,
        tax: invoice.total_tax,
        total: invoice.total,
        amount_paid: invoice.amount_paid,
        amount_due: invoice.amount_due,
        amount_credited: invoice.amount_credited,
    }
}

pub fn tidy_credit_note(note: &CreditNote) -> DocumentRow {
    DocumentRow {
        doc_kind: DocKind::CreditNote,
        doc_type: note.credit_note_type.map(|t| t.to_string()),
        number: note.credit_note_number.clone(),
        contact: note.contact_name().map(str::to_string),
        date: note.issue_date(),
        due_date: note.due_date(),
        payment_date: note.latest_payment_date(),
        status: note.status,
        currency: note.currency_code.clone(),
        subtotal: note.sub_total,
        tax: note.total_tax,
        total: note.total,
        // Credit notes carry no paid/due amounts in the day book
        amount_paid: None,
        amount_due: None,
        amount_credited: note.amount_credited,
    }
}

/// Date-range, status, and contact-exclusion selection.
///
/// Selection happens client-side after the fetch; the report never sends
/// a server-side filter expression.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    /// Inclusive
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
    pub statuses: HashSet<DocumentStatus>,
    /// Uppercased contact names to drop
    pub excluded_contacts: HashSet<String>,
}

impl ReportFilter {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        statuses: impl IntoIterator<Item = DocumentStatus>,
    ) -> Self {
        Self {
            start,
            end,
            statuses: statuses.into_iter().collect(),
            excluded_contacts: HashSet::new(),
        }
    }

    pub fn exclude_contacts(mut self, raw: &str) -> Self {
        self.excluded_contacts = parse_exclusions(raw);
        self
    }

    pub fn matches(&self, row: &DocumentRow) -> bool {
        let Some(date) = row.date else {
            return false;
        };
        if date < self.start || date >= self.end {
            return false;
        }

        match row.status {
            Some(status) if self.statuses.contains(&status) => {}
            _ => return false,
        }

        if let Some(contact) = &row.contact {
            if self.excluded_contacts.contains(&contact.to_uppercase()) {
                return false;
            }
        }

        true
    }
}

/// Split exclusion input on commas and newlines, dropping blanks
pub fn parse_exclusions(raw: &str) -> HashSet<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_uppercase)
        .collect()
}

#[derive(Debug, Default)]
pub struct Report {
    pub all: Vec<DocumentRow>,
    pub authorised: Vec<DocumentRow>,
}

/// Fetch both document kinds, tidy them into rows, and apply the filter.
/// A fresh access token is requested before every page, so long reports
/// survive token expiry mid-run.
pub async fn build_report(
    client: &Client,
    manager: &CredentialManager,
    filter: &ReportFilter,
) -> Result<Report> {
    let invoices = fetch_invoices(client, manager).await?;
    let credit_notes = fetch_credit_notes(client, manager).await?;

    let all: Vec<DocumentRow> = invoices
        .iter()
        .map(tidy_invoice)
        .chain(credit_notes.iter().map(tidy_credit_note))
        .filter(|row| filter.matches(row))
        .collect();

    let authorised = all
        .iter()
        .filter(|row| row.status == Some(DocumentStatus::Authorised))
        .cloned()
        .collect();

    Ok(Report { all, authorised })
}

async fn fetch_invoices(client: &Client, manager: &CredentialManager) -> Result<Vec<Invoice>> {
    let mut documents = Vec::new();

    for page in 1..=PAGE_LIMIT {
        let token = manager.ensure_access_token().await?;
        let response = client.send(&token, &ListInvoices::new().page(page)).await?;
        if response.invoices.is_empty() {
            break;
        }
        tracing::debug!("Fetched {} invoices from page {}", response.invoices.len(), page);
        documents.extend(response.invoices);
    }

    Ok(documents)
}

async fn fetch_credit_notes(
    client: &Client,
    manager: &CredentialManager,
) -> Result<Vec<CreditNote>> {
    let mut documents = Vec::new();

    for page in 1..=PAGE_LIMIT {
        let token = manager.ensure_access_token().await?;
        let response = client
            .send(&token, &ListCreditNotes::new().page(page))
            .await?;
        if response.credit_notes.is_empty() {
            break;
        }
        tracing::debug!(
            "Fetched {} credit notes from page {}",
            response.credit_notes.len(),
            page
        );
        documents.extend(response.credit_notes);
    }

    Ok(documents)
}
