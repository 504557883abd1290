use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::{Account, AccountRepository, Error};

/// Runs each account operation as one load, mutate, store sequence.
///
/// The repository lock is held for the whole sequence, so concurrent callers in
/// this process cannot overwrite each other's updates. When `store` fails the
/// mutated instance is dropped and the persisted record stays as it was.
#[derive(Debug)]
pub struct AccountService<R>
where
    R: AccountRepository,
{
    repository: Mutex<R>,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository: Mutex::new(repository),
        }
    }

    /// Opens a fresh account, replacing any stored one.
    pub fn open(&self, initial_deposit: i64) -> Result<i64, Error> {
        let mut repository = self.lock();

        let account = Account::open(initial_deposit)?;
        Self::persist(&mut *repository, &account)?;

        info!(initial_deposit, "account opened");
        Ok(initial_deposit)
    }

    pub fn deposit(&self, amount: i64) -> Result<i64, Error> {
        let mut repository = self.lock();

        let account = repository.load()?;
        let new_balance = account.deposit(amount)?;
        Self::persist(&mut *repository, &account)?;

        debug!(amount, new_balance, "deposit applied");
        Ok(new_balance)
    }

    pub fn balance(&self) -> Result<i64, Error> {
        let repository = self.lock();
        repository.load()?.balance()
    }

    pub fn close(&self) -> Result<i64, Error> {
        let mut repository = self.lock();

        let account = repository.load()?;
        let payout = account.close()?;
        Self::persist(&mut *repository, &account)?;

        info!(payout, "account closed");
        Ok(payout)
    }

    fn persist(repository: &mut R, account: &Account) -> Result<(), Error> {
        repository.store(account).inspect_err(|e| {
            warn!(error = %e, "failed to store account, change discarded");
        })
    }

    // The guarded repository holds no in-memory state that a panic could
    // leave half-written.
    fn lock(&self) -> MutexGuard<'_, R> {
        self.repository
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
