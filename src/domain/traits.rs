use crate::domain::{Account, Error};

/// Durable home of the single account.
pub trait AccountRepository {
    /// Fails with `Error::NotFound` when no opened account has been stored.
    fn load(&self) -> Result<Account, Error>;

    /// Overwrites whatever was stored before.
    fn store(&mut self, account: &Account) -> Result<(), Error>;
}
