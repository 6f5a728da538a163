/// Local JSON file storage backend.
///
/// Keeps the whole card collection in one pretty-printed JSON array with:
/// - A single process-wide mutex around every read-modify-write cycle
/// - Lazy creation of the data directory and an empty `[]` file
/// - Atomic writes (write to .tmp, fsync, rename)
///
/// Nothing is cached between calls; every operation re-reads the file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{CardStorage, StoreError};
use crate::types::{Card, CardInput};
use crate::validate::validate_card;

const EMPTY_COLLECTION: &str = "[]";

pub struct JsonFileStorage {
    data_file: PathBuf,
    /// Serializes every operation; the file itself is the guarded state.
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // A panic while holding the guard leaves nothing half-updated in memory.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create the data directory and empty collection file. Caller holds the lock.
    fn init_locked(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.data_file.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        match fs::metadata(&self.data_file) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    target: "cardbox.store",
                    "Creating empty card file at {}",
                    self.data_file.display()
                );
                Self::atomic_write(&self.data_file, EMPTY_COLLECTION)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read and decode the collection. Caller holds the lock.
    fn load_locked(&self) -> Result<Vec<Card>, StoreError> {
        self.init_locked()?;
        let raw = fs::read_to_string(&self.data_file)?;
        let cards: Vec<Card> = serde_json::from_str(&raw).map_err(|e| {
            log::error!(
                target: "cardbox.store",
                "Card file {} is not a valid card array: {}",
                self.data_file.display(),
                e
            );
            e
        })?;
        Ok(cards)
    }

    /// Encode and replace the whole collection. Caller holds the lock.
    fn persist_locked(&self, cards: &[Card]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(cards)?;
        Self::atomic_write(&self.data_file, &content)?;
        log::debug!(
            target: "cardbox.store",
            "Wrote {} cards to {}",
            cards.len(),
            self.data_file.display()
        );
        Ok(())
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }

    fn position(cards: &[Card], id: &str) -> Result<usize, StoreError> {
        cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl CardStorage for JsonFileStorage {
    fn ensure_initialized(&self) -> Result<(), StoreError> {
        let _guard = self.acquire();
        self.init_locked()
    }

    fn read_all(&self) -> Result<Vec<Card>, StoreError> {
        let _guard = self.acquire();
        self.load_locked()
    }

    fn get(&self, id: &str) -> Result<Card, StoreError> {
        let _guard = self.acquire();
        let cards = self.load_locked()?;
        let index = Self::position(&cards, id)?;
        Ok(cards[index].clone())
    }

    fn create(&self, input: &CardInput) -> Result<Card, StoreError> {
        let _guard = self.acquire();
        let mut cards = self.load_locked()?;

        let card = validate_card(input, &cards, "")?;
        cards.push(card.clone());
        self.persist_locked(&cards)?;

        log::info!(target: "cardbox.store", "Created card {}", card.id);
        Ok(card)
    }

    fn update(&self, id: &str, input: &CardInput) -> Result<Card, StoreError> {
        let _guard = self.acquire();
        let mut cards = self.load_locked()?;
        let index = Self::position(&cards, id)?;

        let input = CardInput {
            id: Some(id.to_string()),
            ..input.clone()
        };
        let card = validate_card(&input, &cards, id)?;
        cards[index] = card.clone();
        self.persist_locked(&cards)?;

        log::info!(target: "cardbox.store", "Updated card {}", card.id);
        Ok(card)
    }

    fn delete(&self, id: &str) -> Result<Card, StoreError> {
        let _guard = self.acquire();
        let mut cards = self.load_locked()?;
        let index = Self::position(&cards, id)?;

        let removed = cards.remove(index);
        self.persist_locked(&cards)?;

        log::info!(target: "cardbox.store", "Deleted card {}", removed.id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn input(term: &str) -> CardInput {
        CardInput {
            term: Some(term.to_string()),
            category: Some("Concept".to_string()),
            core: Some("x".to_string()),
            boundary: Some("y".to_string()),
            signal: Some("z".to_string()),
            action: Some("w".to_string()),
            ..CardInput::default()
        }
    }

    fn storage_in(dir: &TempDir) -> JsonFileStorage {
        JsonFileStorage::new(dir.path().join("data").join("cards.json"))
    }

    #[test]
    fn test_ensure_initialized_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.ensure_initialized().unwrap();
        assert_eq!(fs::read_to_string(storage.data_file()).unwrap(), "[]");

        // Idempotent: existing content is left alone.
        storage.create(&input("Alpha")).unwrap();
        storage.ensure_initialized().unwrap();
        assert_eq!(storage.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_read_all_initializes_lazily() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        assert!(storage.read_all().unwrap().is_empty());
        assert!(storage.data_file().exists());
    }

    #[test]
    fn test_create_and_get() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let card = storage.create(&input("Idempotence")).unwrap();
        assert_eq!(card.id, "idempotence");
        assert_eq!(storage.get("idempotence").unwrap(), card);

        // Verify it was written to disk as a pretty-printed array
        let on_disk = fs::read_to_string(storage.data_file()).unwrap();
        assert!(on_disk.starts_with("[\n  {"));
        assert!(on_disk.contains("\"term\": \"Idempotence\""));
    }

    #[test]
    fn test_get_missing() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        assert!(matches!(storage.get("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_create_duplicate_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        storage.create(&input("Hello World")).unwrap();
        let err = storage.create(&input("hello   world!")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(storage.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_does_not_write() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.create(&input("Alpha")).unwrap();
        let before = fs::read_to_string(storage.data_file()).unwrap();

        let err = storage.update("beta", &input("Beta")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(fs::read_to_string(storage.data_file()).unwrap(), before);
    }

    #[test]
    fn test_update_keeps_own_id_and_position() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.create(&input("Alpha")).unwrap();
        storage.create(&input("Beta")).unwrap();

        let mut changed = input("Renamed Alpha");
        changed.id = Some("something-else".to_string());
        changed.aliases = Some(vec![Some(" A ".to_string())]);
        let updated = storage.update("alpha", &changed).unwrap();

        // The path ID wins over any ID in the body.
        assert_eq!(updated.id, "alpha");
        assert_eq!(updated.term, "Renamed Alpha");
        assert_eq!(updated.aliases, vec!["A"]);

        let cards = storage.read_all().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0], updated);
        assert_eq!(cards[1].id, "beta");
    }

    #[test]
    fn test_update_validation_failure_does_not_write() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.create(&input("Alpha")).unwrap();

        let mut bad = input("Alpha");
        bad.core = Some("  ".to_string());
        assert!(matches!(
            storage.update("alpha", &bad),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(storage.get("alpha").unwrap().core, "x");
    }

    #[test]
    fn test_delete_preserves_order() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        for term in ["One", "Two", "Three"] {
            storage.create(&input(term)).unwrap();
        }

        let removed = storage.delete("two").unwrap();
        assert_eq!(removed.term, "Two");
        assert_eq!(removed.category, "Concept");

        let ids: Vec<String> = storage.read_all().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["one", "three"]);

        assert!(matches!(storage.delete("two"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_malformed_file_is_surfaced() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.ensure_initialized().unwrap();
        fs::write(storage.data_file(), "{ not json").unwrap();

        let err = storage.read_all().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
        assert!(err.is_storage());

        // No self-healing: writes fail too and the file is left as-is.
        assert!(storage.create(&input("Alpha")).unwrap_err().is_storage());
        assert!(storage.read_all().is_err());
        assert_eq!(fs::read_to_string(storage.data_file()).unwrap(), "{ not json");
    }

    #[test]
    fn test_null_fields_in_file_are_not_malformed() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.ensure_initialized().unwrap();
        fs::write(
            storage.data_file(),
            r#"[{"id":"a","term":"A","category":null,"core":"x","boundary":"y","signal":"z","action":"w","aliases":null}]"#,
        )
        .unwrap();

        let cards = storage.read_all().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category, "");
        assert!(cards[0].aliases.is_empty());

        // The rest of the collection stays writable.
        storage.create(&input("Beta")).unwrap();
        assert_eq!(storage.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_creates_lose_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(storage_in(&dir));
        storage.create(&input("Seed")).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                std::thread::spawn(move || storage.create(&input(&format!("Term {}", i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let cards = storage.read_all().unwrap();
        assert_eq!(cards.len(), 17);
        for i in 0..16 {
            let id = format!("term-{}", i);
            assert!(cards.iter().any(|c| c.id == id), "missing {}", id);
        }
    }
}
