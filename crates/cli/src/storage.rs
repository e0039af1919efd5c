//! Cart persistence in a local JSON file.
//!
//! The file holds the entry list exactly as the web shop keeps it in
//! browser storage: `[{"id":1,"qty":2}]`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use boutique_core::{Cart, CartRepository, StorageError};

/// Default cart file name, matching the browser storage key.
pub const DEFAULT_CART_FILE: &str = "youms_interior_cart_v1.json";

/// A [`CartRepository`] backed by one JSON file.
///
/// Saves write a sibling temporary file and rename it over the target, so
/// readers see either the old list or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self) -> Result<Option<Cart>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str::<Cart>(&raw)?))
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(cart)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), entries = cart.entries().len(), "Cart saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{CartManager, ProductId};

    use super::*;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileCartRepository::new(dir.path().join(DEFAULT_CART_FILE));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileCartRepository::new(dir.path().join(DEFAULT_CART_FILE));

        let mut cart = Cart::new();
        cart.add(ProductId::new(3), 2);
        cart.add(ProductId::new(1), 1);
        repo.save(&cart).unwrap();

        assert_eq!(repo.load().unwrap(), Some(cart));
        let raw = fs::read_to_string(repo.path()).unwrap();
        assert_eq!(raw, r#"[{"id":3,"qty":2},{"id":1,"qty":1}]"#);
        assert!(!repo.temp_path().exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileCartRepository::new(dir.path().join("nested/cart.json"));
        repo.save(&Cart::new()).unwrap();
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), "[]");
    }

    #[test]
    fn test_corrupt_file_reported_and_manager_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CART_FILE);
        fs::write(&path, "{ definitely not a cart").unwrap();
        let repo = JsonFileCartRepository::new(&path);

        assert!(matches!(repo.load(), Err(StorageError::Corrupt(_))));
        let manager = CartManager::open(repo);
        assert!(manager.cart().is_empty());
    }

    #[test]
    fn test_legacy_entries_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CART_FILE);
        fs::write(&path, r#"[{"id":1,"qty":2},{"id":1,"qty":3},{"id":2,"qty":0}]"#).unwrap();

        let cart = JsonFileCartRepository::new(&path).load().unwrap().unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(5));
        assert_eq!(cart.quantity_of(ProductId::new(2)), None);
    }
}
