use super::{parse_first, Allocation, Contact, DocumentStatus, Payment};
use crate::Request;
use crate::macros::setter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

// Common

/// A sales (ACCRECCREDIT) or purchase (ACCPAYCREDIT) credit note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CreditNote {
    #[serde(rename = "CreditNoteID")]
    pub credit_note_id: Option<Uuid>,
    #[serde(rename = "Type")]
    pub credit_note_type: Option<CreditNoteType>,
    pub credit_note_number: Option<String>,
    pub contact: Option<Contact>,
    pub date: Option<String>,
    pub date_string: Option<String>,
    pub due_date: Option<String>,
    pub due_date_string: Option<String>,
    pub status: Option<DocumentStatus>,
    pub currency_code: Option<String>,
    pub sub_total: Option<f64>,
    pub total_tax: Option<f64>,
    pub total: Option<f64>,
    pub amount_credited: Option<f64>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl CreditNote {
    pub fn contact_name(&self) -> Option<&str> {
        self.contact.as_ref()?.name.as_deref()
    }

    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_first([self.date_string.as_deref(), self.date.as_deref()])
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_first([self.due_date_string.as_deref(), self.due_date.as_deref()])
    }

    /// Most recent date across refund payments and credit allocations
    pub fn latest_payment_date(&self) -> Option<NaiveDate> {
        let payments = self.payments.iter().filter_map(Payment::effective_date);
        let allocations = self.allocations.iter().filter_map(Allocation::effective_date);
        payments.chain(allocations).max()
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CreditNoteType {
    #[serde(rename = "ACCRECCREDIT")]
    AccountsReceivableCredit,
    #[serde(rename = "ACCPAYCREDIT")]
    AccountsPayableCredit,
}

impl std::fmt::Display for CreditNoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountsReceivableCredit => f.write_str("ACCRECCREDIT"),
            Self::AccountsPayableCredit => f.write_str("ACCPAYCREDIT"),
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListCreditNotes {
    page: u32,
    order: String,
}

impl ListCreditNotes {
    pub fn new() -> Self {
        Self {
            page: 1,
            order: "Date ASC".to_string(),
        }
    }

    setter!(page: u32);
    setter!(order: String);
}

impl Default for ListCreditNotes {
    fn default() -> Self {
        Self::new()
    }
}

impl Request for ListCreditNotes {
    type Response = CreditNotesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/CreditNotes".into()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("order", self.order.clone()),
            ("page", self.page.to_string()),
        ]
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditNotesResponse {
    #[serde(default)]
    pub credit_notes: Vec<CreditNote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{
            "CreditNotes": [{
                "CreditNoteID": "7d85b631-9a4b-4b15-ad7d-21d8dbbbaf47",
                "Type": "ACCRECCREDIT",
                "CreditNoteNumber": "CN-0007",
                "Contact": {"Name": "Acme Ltd"},
                "DateString": "2025-02-10T00:00:00",
                "Status": "PAID",
                "CurrencyCode": "GBP",
                "SubTotal": 50.0,
                "TotalTax": 10.0,
                "Total": 60.0,
                "Allocations": [{"AppliedDate": "/Date(1739836800000+0000)/", "Amount": 60.0}]
            }]
        }"#;

        let response: CreditNotesResponse = serde_json::from_str(json).unwrap();
        let credit_note = &response.credit_notes[0];

        assert_eq!(credit_note.credit_note_number.as_deref(), Some("CN-0007"));
        assert_eq!(
            credit_note.credit_note_type,
            Some(CreditNoteType::AccountsReceivableCredit)
        );
        assert_eq!(credit_note.status, Some(DocumentStatus::Paid));
        assert_eq!(
            credit_note.issue_date(),
            NaiveDate::from_ymd_opt(2025, 2, 10)
        );
        assert_eq!(
            credit_note.latest_payment_date(),
            NaiveDate::from_ymd_opt(2025, 2, 18)
        );
    }

    #[test]
    fn list_request_paginates_in_date_order() {
        let request = ListCreditNotes::new().page(2_u32);

        assert_eq!(request.endpoint(), "/CreditNotes");
        assert_eq!(
            request.query(),
            vec![
                ("order", "Date ASC".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }
}
