//! Persistent word-bank storage backed by `redb`.
//!
//! Banks are stored whole as bincode payloads keyed by bank id. A second
//! table maps each user to the bank they have selected, which is what
//! `WordBankSource::fetch` resolves.

use crate::corpus::WordBankSource;
use crate::error::{LetterboardError, Result};
use crate::word::WordBank;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};

const BANKS: TableDefinition<&str, &[u8]> = TableDefinition::new("word_banks");
const SELECTED: TableDefinition<&str, &str> = TableDefinition::new("selected_bank");

pub struct RedbBankStore {
    db: Database,
    path: PathBuf,
}

impl RedbBankStore {
    /// Create or open a bank database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path.as_ref())?;

        // Tables must exist before the first read transaction.
        let txn = db.begin_write()?;
        {
            txn.open_table(BANKS)?;
            txn.open_table(SELECTED)?;
        }
        txn.commit()?;

        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace a bank.
    pub fn put_bank(&self, bank: &WordBank) -> Result<()> {
        let payload = bincode::serialize(bank)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(BANKS)?;
            table.insert(bank.id.as_str(), payload.as_slice())?;
        }
        txn.commit()?;
        tracing::info!(bank = %bank.id, words = bank.len(), "word bank stored");
        Ok(())
    }

    /// Make `bank_id` the selected bank for `user_id`.
    pub fn select_bank(&self, user_id: &str, bank_id: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let banks = txn.open_table(BANKS)?;
            if banks.get(bank_id)?.is_none() {
                return Err(LetterboardError::NotFound(bank_id.to_string()));
            }
            let mut selected = txn.open_table(SELECTED)?;
            selected.insert(user_id, bank_id)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Id of the bank selected by `user_id`, if any.
    pub fn selected_bank(&self, user_id: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SELECTED)?;
        Ok(table.get(user_id)?.map(|v| v.value().to_string()))
    }

    /// Delete a bank. Returns true if it existed.
    ///
    /// Selections pointing at the bank are removed too.
    pub fn delete_bank(&self, bank_id: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut banks = txn.open_table(BANKS)?;
            let existed = banks.remove(bank_id)?.is_some();

            let mut selected = txn.open_table(SELECTED)?;
            let mut stale = Vec::new();
            for item in selected.iter()? {
                let (user, bank) = item?;
                if bank.value() == bank_id {
                    stale.push(user.value().to_string());
                }
            }
            for user in stale {
                selected.remove(user.as_str())?;
            }
            existed
        };
        txn.commit()?;
        Ok(existed)
    }

    /// `(id, name)` of every stored bank, ordered by id.
    pub fn list_banks(&self) -> Result<Vec<(String, String)>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(BANKS)?;
        let mut out = Vec::new();
        for item in table.iter()? {
            let (_, payload) = item?;
            let bank: WordBank = bincode::deserialize(payload.value())?;
            out.push((bank.id, bank.name));
        }
        Ok(out)
    }
}

impl WordBankSource for RedbBankStore {
    fn fetch(&self, user_id: &str) -> Result<WordBank> {
        let bank_id = self
            .selected_bank(user_id)?
            .ok_or_else(|| LetterboardError::NotFound(format!("no bank selected for {user_id}")))?;
        self.get_bank(&bank_id)
    }

    fn get_bank(&self, bank_id: &str) -> Result<WordBank> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(BANKS)?;
        match table.get(bank_id)? {
            Some(payload) => Ok(bincode::deserialize(payload.value())?),
            None => Err(LetterboardError::NotFound(bank_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, RedbBankStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbBankStore::open(dir.path().join("banks.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn put_select_fetch() {
        let (_dir, store) = store();
        let bank = WordBank::from_words("b1", "Food", [("apple", true), ("bread", false)]);
        store.put_bank(&bank).unwrap();
        store.select_bank("u1", "b1").unwrap();
        assert_eq!(store.fetch("u1").unwrap(), bank);
    }

    #[test]
    fn selecting_unknown_bank_fails() {
        let (_dir, store) = store();
        let err = store.select_bank("u1", "nope").unwrap_err();
        assert!(matches!(err, LetterboardError::NotFound(_)));
        assert!(store.fetch("u1").is_err());
    }

    #[test]
    fn delete_clears_selection() {
        let (_dir, store) = store();
        store.put_bank(&WordBank::from_words("b1", "A", [("x", true)])).unwrap();
        store.put_bank(&WordBank::from_words("b2", "B", [("y", true)])).unwrap();
        store.select_bank("u1", "b1").unwrap();

        assert!(store.delete_bank("b1").unwrap());
        assert!(!store.delete_bank("b1").unwrap());
        assert_eq!(store.selected_bank("u1").unwrap(), None);
        assert_eq!(store.list_banks().unwrap(), vec![("b2".to_string(), "B".to_string())]);
    }

    #[test]
    fn reopen_keeps_banks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banks.redb");
        {
            let store = RedbBankStore::open(&path).unwrap();
            store.put_bank(&WordBank::from_words("b1", "A", [("hi", true)])).unwrap();
            store.select_bank("u1", "b1").unwrap();
        }
        let store = RedbBankStore::open(&path).unwrap();
        assert_eq!(store.fetch("u1").unwrap().entries[0].text, "hi");
    }
}
