use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EntityShape, Record};

/// One entry of an invoice's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    #[serde(default)]
    pub id: i64,
    pub invoice_id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl AuditLogEntry {
    pub fn new(invoice_id: i64, action: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            invoice_id,
            action: action.into(),
            timestamp,
            user: None,
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl Record for AuditLogEntry {
    const TYPE_NAME: &'static str = "AuditLogEntry";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .integer("invoice_id")
            .text("action")
            .text("timestamp")
            .text("user")
            .mapping("details")
    }
}
