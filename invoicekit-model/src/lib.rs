//! Entity model for InvoiceKit.
//!
//! Defines the records every storage backend persists and the metadata the
//! backends need to do so without knowing the concrete types:
//! - [`Record`] — the contract a persistable record satisfies (integer id, serde form, shape)
//! - [`EntityShape`] / [`FieldShape`] — declared field layout, consulted by lossy codecs
//! - [`EntityKind`] — the repository kinds a backend hands out
//! - invoicing records: [`Client`], [`Company`], [`Product`], [`Invoice`], [`Payment`],
//!   [`PaymentNote`], [`AuditLogEntry`]

mod kind;
mod record;
mod records;
mod shape;

pub use kind::EntityKind;
pub use record::Record;
pub use records::{
    AuditLogEntry, Client, Company, Invoice, InvoiceLine, InvoiceStatus, Payment, PaymentNote,
    Product,
};
pub use shape::{EntityShape, FieldShape, ShapeField};
