use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EntityShape, FieldShape, Record};

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Unpaid,
    PartiallyPaid,
    Paid,
    Cancelled,
    Credited,
}

impl InvoiceStatus {
    /// Statuses that still expect money from the client.
    pub fn is_open(self) -> bool {
        matches!(self, InvoiceStatus::Unpaid | InvoiceStatus::PartiallyPaid)
    }
}

/// A single billed item of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub invoice_id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub tax_rate: f64,
}

impl InvoiceLine {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: 0,
            invoice_id: 0,
            description: description.into(),
            quantity,
            unit_price,
            tax_rate: 0.0,
        }
    }

    pub fn net_amount(&self) -> f64 {
        self.quantity * self.unit_price
    }

    pub fn total(&self) -> f64 {
        self.net_amount() * (1.0 + self.tax_rate)
    }

    pub fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .integer("invoice_id")
            .text("description")
            .number("quantity")
            .number("unit_price")
            .number("tax_rate")
    }
}

/// An issued (or draft) invoice with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: i64,
    pub number: String,
    pub client_id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub amount_paid: f64,
    /// Set on credit notes: the invoice being credited.
    #[serde(default)]
    pub original_invoice_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Invoice {
    pub fn new(
        number: impl Into<String>,
        client_id: i64,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            number: number.into(),
            client_id,
            company_id: None,
            issue_date,
            due_date,
            status: InvoiceStatus::Draft,
            lines: Vec::new(),
            amount_paid: 0.0,
            original_invoice_id: None,
            notes: None,
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(InvoiceLine::net_amount).sum()
    }

    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(InvoiceLine::total).sum()
    }

    pub fn balance_due(&self) -> f64 {
        self.total_amount() - self.amount_paid
    }

    /// An open invoice whose due date lies strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date < today
    }

    /// Numbers the lines 1..n and points them at this invoice.
    pub fn renumber_lines(&mut self) {
        let invoice_id = self.id;
        for (idx, line) in self.lines.iter_mut().enumerate() {
            line.id = idx as i64 + 1;
            line.invoice_id = invoice_id;
        }
    }
}

impl Record for Invoice {
    const TYPE_NAME: &'static str = "Invoice";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
        self.renumber_lines();
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .text("number")
            .integer("client_id")
            .integer("company_id")
            .text("issue_date")
            .text("due_date")
            .text("status")
            .field("lines", FieldShape::records(InvoiceLine::shape()))
            .number("amount_paid")
            .integer("original_invoice_id")
            .text("notes")
            .mapping("metadata")
    }
}
