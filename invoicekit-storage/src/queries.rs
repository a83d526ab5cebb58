//! Kind-specific finders.
//!
//! Every backend gets these through blanket impls over [`Repository`]; they
//! are linear filters over the full, id-ordered record list.

use chrono::NaiveDate;
use invoicekit_model::{
    AuditLogEntry, Client, Company, Invoice, InvoiceStatus, Payment, PaymentNote, Product,
};
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::repository::Repository;

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ── Clients ─────────────────────────────────────────────────────

pub trait ClientQueries: Repository<Client> {
    fn get_by_tax_id(&self, tax_id: &str) -> StorageResult<Option<Client>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|c| c.tax_id.as_deref() == Some(tax_id)))
    }

    fn get_by_name(&self, name: &str) -> StorageResult<Option<Client>> {
        Ok(self.list_all()?.into_iter().find(|c| c.name == name))
    }

    /// Case-insensitive substring match on the name.
    fn search_by_name(&self, name: &str) -> StorageResult<Vec<Client>> {
        let needle = name.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|c| contains_ignore_case(&c.name, &needle))
            .collect())
    }

    /// Case-insensitive substring match on the name or tax id.
    fn search(&self, query: &str) -> StorageResult<Vec<Client>> {
        let needle = query.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|c| {
                contains_ignore_case(&c.name, &needle)
                    || c.tax_id
                        .as_deref()
                        .is_some_and(|t| contains_ignore_case(t, &needle))
            })
            .collect())
    }
}

impl<R: Repository<Client> + ?Sized> ClientQueries for R {}

// ── Invoices ────────────────────────────────────────────────────

/// Aggregate figures over every stored invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub total_count: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub overdue_count: usize,
    pub total_amount: f64,
    pub total_paid: f64,
    /// Outstanding balance of every invoice not yet paid.
    pub total_due: f64,
}

pub trait InvoiceQueries: Repository<Invoice> {
    fn get_by_number(&self, number: &str) -> StorageResult<Option<Invoice>> {
        Ok(self.list_all()?.into_iter().find(|i| i.number == number))
    }

    fn get_by_client(&self, client_id: i64) -> StorageResult<Vec<Invoice>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|i| i.client_id == client_id)
            .collect())
    }

    fn get_by_status(&self, status: InvoiceStatus) -> StorageResult<Vec<Invoice>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|i| i.status == status)
            .collect())
    }

    fn get_overdue(&self, today: NaiveDate) -> StorageResult<Vec<Invoice>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|i| i.is_overdue(today))
            .collect())
    }

    fn summary(&self, today: NaiveDate) -> StorageResult<InvoiceSummary> {
        let invoices = self.list_all()?;
        let mut summary = InvoiceSummary {
            total_count: invoices.len(),
            ..InvoiceSummary::default()
        };
        for invoice in &invoices {
            match invoice.status {
                InvoiceStatus::Paid => summary.paid_count += 1,
                InvoiceStatus::Unpaid => summary.unpaid_count += 1,
                _ => {}
            }
            if invoice.is_overdue(today) {
                summary.overdue_count += 1;
            }
            summary.total_amount += invoice.total_amount();
            summary.total_paid += invoice.amount_paid;
            if invoice.status != InvoiceStatus::Paid {
                summary.total_due += invoice.balance_due();
            }
        }
        Ok(summary)
    }
}

impl<R: Repository<Invoice> + ?Sized> InvoiceQueries for R {}

// ── Payments ────────────────────────────────────────────────────

pub trait PaymentQueries: Repository<Payment> {
    fn get_by_invoice(&self, invoice_id: i64) -> StorageResult<Vec<Payment>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.invoice_id == invoice_id)
            .collect())
    }

    fn total_for_invoice(&self, invoice_id: i64) -> StorageResult<f64> {
        Ok(self
            .get_by_invoice(invoice_id)?
            .iter()
            .map(|p| p.amount)
            .sum())
    }

    /// Payments dated within `start..=end`.
    fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> StorageResult<Vec<Payment>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| (start..=end).contains(&p.payment_date))
            .collect())
    }
}

impl<R: Repository<Payment> + ?Sized> PaymentQueries for R {}

// ── Companies ───────────────────────────────────────────────────

pub trait CompanyQueries: Repository<Company> {
    fn get_active(&self) -> StorageResult<Vec<Company>> {
        Ok(self.list_all()?.into_iter().filter(|c| c.is_active).collect())
    }

    fn get_default(&self) -> StorageResult<Option<Company>> {
        Ok(self.list_all()?.into_iter().find(|c| c.is_default))
    }

    fn get_by_name(&self, name: &str) -> StorageResult<Option<Company>> {
        Ok(self.list_all()?.into_iter().find(|c| c.name == name))
    }
}

impl<R: Repository<Company> + ?Sized> CompanyQueries for R {}

// ── Products ────────────────────────────────────────────────────

pub trait ProductQueries: Repository<Product> {
    fn get_by_code(&self, code: &str) -> StorageResult<Option<Product>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|p| p.code.as_deref() == Some(code)))
    }

    fn get_active(&self) -> StorageResult<Vec<Product>> {
        Ok(self.list_all()?.into_iter().filter(|p| p.is_active).collect())
    }

    fn get_by_category(&self, category: &str) -> StorageResult<Vec<Product>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.category.as_deref() == Some(category))
            .collect())
    }

    /// Case-insensitive substring match on the name or code.
    fn search(&self, query: &str) -> StorageResult<Vec<Product>> {
        let needle = query.to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| {
                contains_ignore_case(&p.name, &needle)
                    || p.code
                        .as_deref()
                        .is_some_and(|c| contains_ignore_case(c, &needle))
            })
            .collect())
    }
}

impl<R: Repository<Product> + ?Sized> ProductQueries for R {}

// ── Payment notes ───────────────────────────────────────────────

pub trait PaymentNoteQueries: Repository<PaymentNote> {
    /// Active notes, restricted to `company_id` when one is given.
    fn get_active(&self, company_id: Option<i64>) -> StorageResult<Vec<PaymentNote>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|n| n.is_active && (company_id.is_none() || n.company_id == company_id))
            .collect())
    }

    /// Notes whose company is exactly `company_id`; `None` selects shared notes.
    fn get_by_company(&self, company_id: Option<i64>) -> StorageResult<Vec<PaymentNote>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|n| n.company_id == company_id)
            .collect())
    }

    /// First active default note, restricted to `company_id` when one is given.
    fn get_default(&self, company_id: Option<i64>) -> StorageResult<Option<PaymentNote>> {
        Ok(self.list_all()?.into_iter().find(|n| {
            n.is_default && n.is_active && (company_id.is_none() || n.company_id == company_id)
        }))
    }
}

impl<R: Repository<PaymentNote> + ?Sized> PaymentNoteQueries for R {}

// ── Audit log ───────────────────────────────────────────────────

pub trait AuditLogQueries: Repository<AuditLogEntry> {
    fn get_by_invoice(&self, invoice_id: i64) -> StorageResult<Vec<AuditLogEntry>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|e| e.invoice_id == invoice_id)
            .collect())
    }
}

impl<R: Repository<AuditLogEntry> + ?Sized> AuditLogQueries for R {}
