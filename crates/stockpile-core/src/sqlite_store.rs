use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::item::{Item, ItemId, ItemPatch, NewItem};
use crate::store::{ItemStore, StoreError};

/// SQLite-backed implementation of the [`ItemStore`] trait.
///
/// A single connection behind a mutex serializes writers; racing
/// updates to the same row are last-write-wins. `AUTOINCREMENT` keeps
/// deleted ids from ever being reassigned.
pub struct SqliteItemStore {
    conn: Mutex<Connection>,
}

impl SqliteItemStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        Ok(())
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> Result<Item, rusqlite::Error> {
        Ok(Item {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            created_at: millis_to_datetime(row.get(4)?),
            updated_at: millis_to_datetime(row.get(5)?),
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, description, price, created_at, updated_at";

impl ItemStore for SqliteItemStore {
    fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let now_ms = Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO items (name, description, price, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![item.name, item.description, item.price, now_ms, now_ms],
        )
        .map_err(|e| StoreError::Storage(format!("insert: {}", e)))?;

        let id = conn.last_insert_rowid();
        Ok(Item {
            id,
            name: item.name,
            description: item.description,
            price: item.price,
            created_at: millis_to_datetime(now_ms),
            updated_at: millis_to_datetime(now_ms),
        })
    }

    fn list(&self) -> Result<Vec<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM items", SELECT_COLUMNS))
            .map_err(|e| StoreError::Storage(format!("prepare list: {}", e)))?;
        let items = stmt
            .query_map([], |row| Self::row_to_item(row))
            .map_err(|e| StoreError::Storage(format!("query list: {}", e)))?
            .collect::<Result<Vec<Item>, _>>()
            .map_err(|e| StoreError::Storage(format!("collect list: {}", e)))?;
        Ok(items)
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        conn.query_row(
            &format!("SELECT {} FROM items WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            |row| Self::row_to_item(row),
        )
        .optional()
        .map_err(|e| StoreError::Storage(format!("query get: {}", e)))
    }

    fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let existing = conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                |row| Self::row_to_item(row),
            )
            .optional()
            .map_err(|e| StoreError::Storage(format!("query update: {}", e)))?
            .ok_or(StoreError::NotFound(id))?;

        let name = patch.name.unwrap_or(existing.name);
        let description = patch.description.or(existing.description);
        let price = patch.price.unwrap_or(existing.price);
        let now_ms = Utc::now().timestamp_millis();

        conn.execute(
            "UPDATE items SET name = ?1, description = ?2, price = ?3, updated_at = ?4
             WHERE id = ?5",
            params![name, description, price, now_ms, id],
        )
        .map_err(|e| StoreError::Storage(format!("update: {}", e)))?;

        Ok(Item {
            id,
            name,
            description,
            price,
            created_at: existing.created_at,
            updated_at: millis_to_datetime(now_ms),
        })
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let affected = conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Storage(format!("delete: {}", e)))?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete_many(&self, ids: &[ItemId]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let affected = conn
            .execute(
                &format!("DELETE FROM items WHERE id IN ({})", placeholders),
                params_from_iter(ids.iter()),
            )
            .map_err(|e| StoreError::Storage(format!("delete_many: {}", e)))?;
        Ok(affected)
    }
}

fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteItemStore {
        SqliteItemStore::open_in_memory().unwrap()
    }

    fn widget() -> NewItem {
        NewItem {
            name: "Widget".into(),
            description: Some("A small widget".into()),
            price: 9.99,
        }
    }

    #[test]
    fn create_assigns_distinct_ids() {
        let store = store();
        let a = store.create(widget()).unwrap();
        let b = store.create(widget()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = store();
        let created = store.create(widget()).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn get_missing_is_none() {
        let store = store();
        assert!(store.get(999).unwrap().is_none());
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let store = store();
        let created = store.create(widget()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let updated = store
            .update(
                created.id,
                ItemPatch {
                    price: Some(19.99),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.price, 19.99);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = store();
        let err = store.update(999, ItemPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = store();
        let err = store.delete(999).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[test]
    fn delete_removes_row() {
        let store = store();
        let created = store.create(widget()).unwrap();
        store.delete(created.id).unwrap();
        assert!(store.get(created.id).unwrap().is_none());
    }

    #[test]
    fn delete_many_skips_missing_ids() {
        let store = store();
        let a = store.create(widget()).unwrap();
        let b = store.create(widget()).unwrap();
        let removed = store.delete_many(&[a.id, b.id, 999]).unwrap();
        assert_eq!(removed, 2);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn delete_many_empty_is_noop() {
        let store = store();
        assert_eq!(store.delete_many(&[]).unwrap(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let a = store.create(widget()).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(widget()).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn open_on_disk_persists_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockpile.db");
        let created = {
            let store = SqliteItemStore::open(&path).unwrap();
            store.create(widget()).unwrap()
        };
        let store = SqliteItemStore::open(&path).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
    }
}
