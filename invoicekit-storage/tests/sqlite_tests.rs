#![cfg(feature = "sqlite")]

mod common;

use common::{Widget, sample_invoice};
use invoicekit_model::{Client, EntityKind, Invoice, Record};
use invoicekit_storage::{ClientQueries, Repository, SqliteDatabase, StorageError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn crud_scenario() {
    let db = SqliteDatabase::open_in_memory(false).unwrap();
    let repo = db.repository::<Widget>(EntityKind::Client);

    let created = repo.create(Widget::new("Acme", 1)).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(repo.get_by_id(1).unwrap().unwrap(), created);

    let mut renamed = created.clone();
    renamed.name = "Acme Corp".into();
    repo.update(renamed).unwrap();
    assert_eq!(repo.get_by_id(1).unwrap().unwrap().name, "Acme Corp");

    assert!(repo.delete(1).unwrap());
    assert!(!repo.delete(1).unwrap());
    assert_eq!(repo.get_by_id(1).unwrap(), None);
}

#[test]
fn pagination_and_retired_ids() {
    let db = SqliteDatabase::open_in_memory(true).unwrap();
    let repo = db.repository::<Widget>(EntityKind::Product);
    for name in ["first", "second", "third"] {
        repo.create(Widget::new(name, 0)).unwrap();
    }

    let page = repo.get_all(1, 1).unwrap();
    assert_eq!(page[0].name, "second");
    assert_eq!(repo.list_all().unwrap().len(), 3);
    assert!(repo.get_all(5, 5).unwrap().is_empty());

    repo.delete(3).unwrap();
    assert_eq!(repo.create(Widget::new("fourth", 0)).unwrap().id, 4);
}

#[test]
fn update_missing_is_not_found() {
    let db = SqliteDatabase::open_in_memory(false).unwrap();
    let repo = db.repository::<Widget>(EntityKind::Company);
    let mut ghost = Widget::new("ghost", 0);
    ghost.id = 3;
    assert!(matches!(
        repo.update(ghost).unwrap_err(),
        StorageError::NotFound { id: 3, .. }
    ));
}

#[test]
fn kinds_use_separate_tables() {
    let db = SqliteDatabase::open_in_memory(false).unwrap();
    let clients = db.repository::<Client>(EntityKind::Client);
    let invoices = db.repository::<Invoice>(EntityKind::Invoice);

    clients.create(Client::new("Acme").with_tax_id("T-1")).unwrap();
    let invoice = invoices.create(sample_invoice()).unwrap();

    assert_eq!(invoice.id, 1);
    assert_eq!(invoice.lines[1].invoice_id, 1);
    assert_eq!(invoices.get_by_id(1).unwrap().unwrap(), invoice);
    assert_eq!(clients.get_by_tax_id("T-1").unwrap().unwrap().id(), 1);
}

#[test]
fn file_database_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("invoices.db");
    {
        let db = SqliteDatabase::open(&path, false).unwrap();
        db.repository::<Client>(EntityKind::Client)
            .create(Client::new("Persisted"))
            .unwrap();
    }

    let db = SqliteDatabase::open(&path, false).unwrap();
    db.ping().unwrap();
    let clients = db.repository::<Client>(EntityKind::Client).list_all().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Persisted");
}
