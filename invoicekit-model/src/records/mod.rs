mod audit;
mod client;
mod company;
mod invoice;
mod payment;
mod payment_note;
mod product;

pub use audit::AuditLogEntry;
pub use client::Client;
pub use company::Company;
pub use invoice::{Invoice, InvoiceLine, InvoiceStatus};
pub use payment::Payment;
pub use payment_note::PaymentNote;
pub use product::Product;

fn default_true() -> bool {
    true
}
