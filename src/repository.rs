use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{Account, AccountRecord, AccountRepository, Error};

/// Stores the account as a JSON document in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl AccountRepository for JsonFileRepository {
    fn load(&self) -> Result<Account, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotFound),
            Err(e) => return Err(Error::IO(e)),
        };

        let record: AccountRecord = serde_json::from_slice(&bytes)?;
        Account::from_record(record)
    }

    fn store(&mut self, account: &Account) -> Result<(), Error> {
        let bytes = serde_json::to_vec(&account.snapshot())?;

        // Write beside the target and rename over it so readers never see a torn file.
        let temp = self.temp_path();
        fs::write(&temp, bytes)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(Error::IO(e));
        }
        Ok(())
    }
}

/// Keeps the record in memory. Useful for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    record: Option<AccountRecord>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self { record: None }
    }

    pub fn with_record(record: AccountRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl AccountRepository for InMemoryRepository {
    fn load(&self) -> Result<Account, Error> {
        let record = self.record.ok_or(Error::NotFound)?;
        Account::from_record(record)
    }

    fn store(&mut self, account: &Account) -> Result<(), Error> {
        self.record = Some(account.snapshot());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{InMemoryRepository, JsonFileRepository};
    use crate::domain::{Account, AccountRecord, AccountRepository, Error};

    #[test]
    fn load_without_store_is_not_found() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("account.json"));

        assert!(matches!(repo.load(), Err(Error::NotFound)));
        assert!(matches!(
            InMemoryRepository::new().load(),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut repo = JsonFileRepository::new(dir.path().join("account.json"));

        let account = Account::open(250).unwrap();
        account.deposit(-50).unwrap();
        account.close().unwrap();
        repo.store(&account).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.snapshot(), account.snapshot());
        assert!(!dir.path().join("account.json.tmp").exists());
    }

    #[test]
    fn stored_document_uses_camel_case_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("account.json");
        let mut repo = JsonFileRepository::new(&path);

        repo.store(&Account::open(7).unwrap()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "balance": 7, "isOpened": true, "isClosed": false })
        );
    }

    #[test]
    fn unopened_record_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("account.json");
        fs::write(&path, r#"{"balance": 12}"#).unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(matches!(repo.load(), Err(Error::NotFound)));
    }

    #[test]
    fn empty_or_unflagged_record_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("account.json");
        let repo = JsonFileRepository::new(&path);

        for contents in ["{}", r#"{"isOpened": false}"#] {
            fs::write(&path, contents).unwrap();
            assert!(matches!(repo.load(), Err(Error::NotFound)), "{contents}");
        }
    }

    #[test]
    fn negative_open_balance_on_disk_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("account.json");
        fs::write(&path, r#"{"balance": -5, "isOpened": true, "isClosed": false}"#).unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(matches!(repo.load(), Err(Error::CorruptRecord(-5))));
    }

    #[test]
    fn corrupt_record_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("account.json");
        fs::write(&path, "not json").unwrap();

        let repo = JsonFileRepository::new(&path);
        let err = repo.load().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn store_into_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let mut repo = JsonFileRepository::new(dir.path().join("missing").join("account.json"));

        let err = repo.store(&Account::open(1).unwrap()).unwrap_err();
        assert!(matches!(err, Error::IO(_)));
    }

    #[test]
    fn in_memory_repository_keeps_snapshot() {
        let mut repo = InMemoryRepository::new();
        let account = Account::open(30).unwrap();
        repo.store(&account).unwrap();

        account.deposit(5).unwrap();
        assert_eq!(repo.load().unwrap().balance().unwrap(), 30);

        let unopened = InMemoryRepository::with_record(AccountRecord::default());
        assert!(matches!(unopened.load(), Err(Error::NotFound)));
    }
}
