use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity kinds every storage backend hands out repositories for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Invoice,
    Client,
    Payment,
    Company,
    Product,
    PaymentNote,
    AuditLog,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Invoice,
        EntityKind::Client,
        EntityKind::Payment,
        EntityKind::Company,
        EntityKind::Product,
        EntityKind::PaymentNote,
        EntityKind::AuditLog,
    ];

    /// Directory (file backend) or table (SQL backends) holding this kind.
    pub const fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Invoice => "invoices",
            EntityKind::Client => "clients",
            EntityKind::Payment => "payments",
            EntityKind::Company => "companies",
            EntityKind::Product => "products",
            EntityKind::PaymentNote => "payment_notes",
            EntityKind::AuditLog => "audit_logs",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Invoice => "invoice",
            EntityKind::Client => "client",
            EntityKind::Payment => "payment",
            EntityKind::Company => "company",
            EntityKind::Product => "product",
            EntityKind::PaymentNote => "payment_note",
            EntityKind::AuditLog => "audit_log",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
