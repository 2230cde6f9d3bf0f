use super::{parse_first, Allocation, Contact, DocumentStatus, Payment};
use crate::Request;
use crate::macros::setter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

// Common

/// A sales (ACCREC) or purchase (ACCPAY) invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    #[serde(rename = "InvoiceID")]
    pub invoice_id: Option<Uuid>,
    #[serde(rename = "Type")]
    pub invoice_type: Option<InvoiceType>,
    pub invoice_number: Option<String>,
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
    pub amount_paid: Option<f64>,
    pub amount_due: Option<f64>,
    pub amount_credited: Option<f64>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

impl Invoice {
    pub fn contact_name(&self) -> Option<&str> {
        self.contact.as_ref()?.name.as_deref()
    }

    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_first([self.date_string.as_deref(), self.date.as_deref()])
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_first([self.due_date_string.as_deref(), self.due_date.as_deref()])
    }

    /// Most recent date across payments and credit allocations
    pub fn latest_payment_date(&self) -> Option<NaiveDate> {
        let payments = self.payments.iter().filter_map(Payment::effective_date);
        let allocations = self.allocations.iter().filter_map(Allocation::effective_date);
        payments.chain(allocations).max()
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceType {
    #[serde(rename = "ACCREC")]
    AccountsReceivable,
    #[serde(rename = "ACCPAY")]
    AccountsPayable,
}

impl std::fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountsReceivable => f.write_str("ACCREC"),
            Self::AccountsPayable => f.write_str("ACCPAY"),
        }
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ListInvoices {
    page: u32,
    order: String,
}

impl ListInvoices {
    pub fn new() -> Self {
        Self {
            page: 1,
            order: "Date ASC".to_string(),
        }
    }

    setter!(page: u32);
    setter!(order: String);
}

impl Default for ListInvoices {
    fn default() -> Self {
        Self::new()
    }
}

impl Request for ListInvoices {
    type Response = InvoicesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/Invoices".into()
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
pub struct InvoicesResponse {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{
            "Invoices": [{
                "InvoiceID": "220ddca8-3144-4085-9a88-2d72c5133734",
                "Type": "ACCREC",
                "InvoiceNumber": "INV-0042",
                "Contact": {"Name": "Acme Ltd"},
                "Date": "/Date(1735689600000+0000)/",
                "DateString": "2025-01-01T00:00:00",
                "DueDateString": "2025-01-31T00:00:00",
                "Status": "AUTHORISED",
                "CurrencyCode": "GBP",
                "SubTotal": 100.0,
                "TotalTax": 20.0,
                "Total": 120.0,
                "AmountPaid": 0.0,
                "AmountDue": 120.0,
                "Payments": [{"Date": "/Date(1736899200000+0000)/", "Amount": 120.0}]
            }]
        }"#;

        let response: InvoicesResponse = serde_json::from_str(json).unwrap();
        let invoice = &response.invoices[0];

        assert_eq!(invoice.invoice_number.as_deref(), Some("INV-0042"));
        assert_eq!(invoice.invoice_type, Some(InvoiceType::AccountsReceivable));
        assert_eq!(invoice.contact_name(), Some("Acme Ltd"));
        assert_eq!(invoice.status, Some(DocumentStatus::Authorised));
        assert_eq!(
            invoice.issue_date(),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(
            invoice.due_date(),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(
            invoice.latest_payment_date(),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn latest_payment_date_spans_payments_and_allocations() {
        let mut invoice: Invoice =
            serde_json::from_str(r#"{"InvoiceNumber": "INV-0001"}"#).unwrap();
        invoice.payments = vec![Payment {
            date: None,
            date_string: Some("2025-02-01T00:00:00".to_string()),
            amount: Some(50.0),
        }];
        invoice.allocations = vec![Allocation {
            applied_date: Some("2025-03-01T00:00:00".to_string()),
            amount: Some(10.0),
        }];

        assert_eq!(
            invoice.latest_payment_date(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[test]
    fn list_request_paginates_in_date_order() {
        let request = ListInvoices::new().page(3_u32);

        assert_eq!(request.endpoint(), "/Invoices");
        assert_eq!(
            request.query(),
            vec![
                ("order", "Date ASC".to_string()),
                ("page", "3".to_string()),
            ]
        );
    }
}
