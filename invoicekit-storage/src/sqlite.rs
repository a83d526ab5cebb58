//! SQLite-backed repositories.
//!
//! Each entity kind gets a table `(id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT)`
//! holding the record's JSON form. `AUTOINCREMENT` keeps deleted ids retired.

use invoicekit_model::{EntityKind, Record};
use rusqlite::{Connection, OptionalExtension, params};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::repository::Repository;

type SharedConnection = Arc<Mutex<Connection>>;

/// One SQLite connection shared by every repository handed out from it.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    conn: SharedConnection,
    echo: bool,
}

impl SqliteDatabase {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, echo: bool) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?, echo)
    }

    pub fn open_in_memory(echo: bool) -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, echo)
    }

    fn from_connection(conn: Connection, echo: bool) -> StorageResult<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            echo,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = lock(&self.conn)?;
        for kind in EntityKind::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    body TEXT NOT NULL
                )",
                kind.collection_name()
            );
            echo_sql(self.echo, &sql);
            conn.execute_batch(&sql)?;
        }
        Ok(())
    }

    /// Round-trips a trivial query.
    pub fn ping(&self) -> StorageResult<()> {
        let conn = lock(&self.conn)?;
        echo_sql(self.echo, "SELECT 1");
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Repository for `kind`, sharing this database's connection.
    pub fn repository<T: Record>(&self, kind: EntityKind) -> SqliteRepository<T> {
        SqliteRepository {
            conn: Arc::clone(&self.conn),
            table: kind.collection_name(),
            echo: self.echo,
            _record: PhantomData,
        }
    }
}

/// [`Repository`] over one table of a [`SqliteDatabase`].
#[derive(Debug)]
pub struct SqliteRepository<T: Record> {
    conn: SharedConnection,
    table: &'static str,
    echo: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteRepository<T> {
    fn decode(id: i64, body: &str) -> StorageResult<T> {
        let mut record: T = serde_json::from_str(body)?;
        if record.id() != id {
            record.set_id(id);
        }
        Ok(record)
    }
}

impl<T: Record> Repository<T> for SqliteRepository<T> {
    fn create(&self, mut entity: T) -> StorageResult<T> {
        let conn = lock(&self.conn)?;

        let insert = format!("INSERT INTO {} (body) VALUES (?1)", self.table);
        echo_sql(self.echo, &insert);
        conn.execute(&insert, params![serde_json::to_string(&entity)?])?;

        entity.set_id(conn.last_insert_rowid());
        let update = format!("UPDATE {} SET body = ?1 WHERE id = ?2", self.table);
        echo_sql(self.echo, &update);
        conn.execute(&update, params![serde_json::to_string(&entity)?, entity.id()])?;
        Ok(entity)
    }

    fn get_by_id(&self, id: i64) -> StorageResult<Option<T>> {
        let conn = lock(&self.conn)?;
        let sql = format!("SELECT body FROM {} WHERE id = ?1", self.table);
        echo_sql(self.echo, &sql);
        let body: Option<String> = conn
            .query_row(&sql, params![id], |row| row.get(0))
            .optional()?;
        body.map(|body| Self::decode(id, &body)).transpose()
    }

    fn get_all(&self, skip: usize, limit: usize) -> StorageResult<Vec<T>> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "SELECT id, body FROM {} ORDER BY id LIMIT ?1 OFFSET ?2",
            self.table
        );
        echo_sql(self.echo, &sql);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit, offset], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, body) = row?;
            records.push(Self::decode(id, &body)?);
        }
        Ok(records)
    }

    fn update(&self, entity: T) -> StorageResult<T> {
        let conn = lock(&self.conn)?;
        let sql = format!("UPDATE {} SET body = ?1 WHERE id = ?2", self.table);
        echo_sql(self.echo, &sql);
        let changed = conn.execute(&sql, params![serde_json::to_string(&entity)?, entity.id()])?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                kind: T::TYPE_NAME,
                id: entity.id(),
            });
        }
        Ok(entity)
    }

    fn delete(&self, id: i64) -> StorageResult<bool> {
        let conn = lock(&self.conn)?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table);
        echo_sql(self.echo, &sql);
        Ok(conn.execute(&sql, params![id])? > 0)
    }
}

fn lock(conn: &SharedConnection) -> StorageResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StorageError::LockPoisoned("sqlite connection"))
}

fn echo_sql(echo: bool, sql: &str) {
    if echo {
        debug!(sql, "Executing SQL");
    }
}
