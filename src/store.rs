use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::list::ItemList;

/// Storage key for the persisted list; also the document's file stem.
pub const STORAGE_KEY: &str = "manual-sort-data";

/// Items seeded on first run or after unreadable stored data.
pub const DEFAULT_ITEMS: [&str; 5] = ["Cats", "Dogs", "Birds", "Rabbits", "Horses"];

/// Write-through JSON store for the committed item list.
///
/// One document under one storage key; callers save after every change, so
/// the file always mirrors the in-memory list. Anything unexpected in the
/// stored document resets to defaults rather than failing.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Store rooted at `dir`, named after the standard storage key.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn seeded() -> ItemList {
        let mut list = ItemList::new();
        for value in DEFAULT_ITEMS {
            list.add(value);
        }
        list
    }

    /// Loads the stored list, seeding defaults when the document is missing,
    /// unreadable, or holds no items.
    pub fn load_or_seed(&self) -> ItemList {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                info!("no stored list at {}, seeding defaults", self.path.display());
                return Self::seeded();
            }
        };
        match serde_json::from_str::<ItemList>(&raw) {
            Ok(list) if !list.is_empty() => list,
            Ok(_) => {
                info!("stored list is empty, seeding defaults");
                Self::seeded()
            }
            Err(err) => {
                warn!(
                    "stored list at {} is unreadable ({err}), resetting to defaults",
                    self.path.display()
                );
                Self::seeded()
            }
        }
    }

    /// Persists the list. Called after every change.
    pub fn save(&self, list: &ItemList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(list)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> (Store, PathBuf) {
        let dir = std::env::temp_dir().join(format!("pairsort-test-{}", Uuid::new_v4()));
        (Store::open(&dir), dir)
    }

    #[test]
    fn missing_document_seeds_defaults() {
        let (store, dir) = temp_store();
        let list = store.load_or_seed();
        let values: Vec<&str> = list.items.iter().map(|it| it.value.as_str()).collect();
        assert_eq!(values, DEFAULT_ITEMS);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn save_then_load_round_trips_relations() {
        let (store, dir) = temp_store();
        let mut list = ItemList::new();
        list.add_batch("B, A");
        let a_id = list.items[1].id;
        let b_id = list.items[0].id;
        list.items[0].add_before(a_id);
        list.items[1].add_after(b_id);

        store.save(&list).unwrap();
        let loaded = store.load_or_seed();
        assert_eq!(loaded, list);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unreadable_document_resets_to_defaults() {
        let (store, dir) = temp_store();
        fs::create_dir_all(&dir).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        let list = store.load_or_seed();
        assert_eq!(list.len(), DEFAULT_ITEMS.len());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_stored_list_resets_to_defaults() {
        let (store, dir) = temp_store();
        store.save(&ItemList::new()).unwrap();
        let list = store.load_or_seed();
        assert_eq!(list.len(), DEFAULT_ITEMS.len());
        let _ = fs::remove_dir_all(dir);
    }
}
