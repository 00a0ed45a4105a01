//! Cart persistence
//!
//! The cart book is kept as one JSON file on the device so open tables
//! survive an app restart. Loading never fails: a missing or corrupt
//! file just yields an empty book.

use std::fs;
use std::path::PathBuf;

use crate::cart::CartBook;
use crate::error::ClientResult;

/// JSON-file backed storage for the cart book
#[derive(Debug, Clone)]
pub struct CartStorage {
    path: PathBuf,
}

impl CartStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cart book, falling back to an empty one when the file
    /// is missing or unreadable
    pub fn load(&self) -> CartBook {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return CartBook::new();
            }
            Err(err) => {
                tracing::warn!("Failed to read cart file {:?}: {err}", self.path);
                return CartBook::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(book) => book,
            Err(err) => {
                tracing::warn!("Discarding corrupt cart file {:?}: {err}", self.path);
                CartBook::new()
            }
        }
    }

    /// Persist the cart book
    pub fn save(&self, book: &CartBook) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(book)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;

    fn line(item_id: i64, cantidad: i32) -> CartLine {
        CartLine {
            item_id,
            es_especial: false,
            nombre: format!("Plato {item_id}"),
            precio: "10.00".parse().unwrap(),
            cantidad,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CartStorage::new(dir.path().join("carts.json"));

        let mut book = CartBook::new();
        book.cart_mut(4).add(line(1, 2));
        book.cart_mut(4).mark_sent();
        book.cart_mut(4).orden_id = Some(17);
        book.cart_mut(7).add(line(2, 1));

        storage.save(&book).unwrap();
        let loaded = storage.load();

        let mesa4 = loaded.cart(4).unwrap();
        assert_eq!(mesa4.orden_id, Some(17));
        assert_eq!(mesa4.enviados.len(), 1);
        assert!(mesa4.nuevos.is_empty());
        assert_eq!(loaded.cart(7).unwrap().pending_count(), 1);
    }

    #[test]
    fn test_missing_file_yields_empty_book() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CartStorage::new(dir.path().join("does-not-exist.json"));
        assert_eq!(storage.load().mesas().count(), 0);
    }

    #[test]
    fn test_corrupt_file_yields_empty_book() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carts.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = CartStorage::new(path);
        assert_eq!(storage.load().mesas().count(), 0);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CartStorage::new(dir.path().join("nested/deep/carts.json"));
        storage.save(&CartBook::new()).unwrap();
        assert_eq!(storage.load().mesas().count(), 0);
    }
}
