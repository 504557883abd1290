use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Persisted shape of an account. Missing fields decode as zero or `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountRecord {
    pub balance: i64,    // minor currency units, never negative while open
    pub is_opened: bool, // distinguishes a created account from a zeroed record
    pub is_closed: bool, // terminal
}

/// The single account. All access goes through the internal lock.
#[derive(Debug)]
pub struct Account {
    state: Mutex<AccountRecord>,
}

impl Account {
    pub fn open(initial_deposit: i64) -> Result<Self, Error> {
        if initial_deposit < 0 {
            return Err(Error::InvalidAmount(initial_deposit));
        }

        Ok(Self {
            state: Mutex::new(AccountRecord {
                balance: initial_deposit,
                is_opened: true,
                is_closed: false,
            }),
        })
    }

    /// Rebuilds an account from storage. A record that was never opened is
    /// treated exactly like a missing one.
    pub fn from_record(record: AccountRecord) -> Result<Self, Error> {
        if !record.is_opened {
            return Err(Error::NotFound);
        }
        if !record.is_closed && record.balance < 0 {
            return Err(Error::CorruptRecord(record.balance));
        }

        Ok(Self {
            state: Mutex::new(record),
        })
    }

    /// Adds `amount` to the balance; a negative amount is a withdrawal.
    pub fn deposit(&self, amount: i64) -> Result<i64, Error> {
        let mut state = self.lock();

        if state.is_closed {
            return Err(Error::AccountClosed);
        }

        let new_balance = state
            .balance
            .checked_add(amount)
            .ok_or(Error::InvalidAmount(amount))?;

        if new_balance < 0 {
            return Err(Error::InsufficientFunds {
                balance: state.balance,
                amount,
            });
        }

        state.balance = new_balance;
        Ok(new_balance)
    }

    pub fn balance(&self) -> Result<i64, Error> {
        let state = self.lock();

        if state.is_closed {
            return Err(Error::AccountClosed);
        }
        Ok(state.balance)
    }

    /// Closes the account and returns the payout. The balance stays as it was.
    pub fn close(&self) -> Result<i64, Error> {
        let mut state = self.lock();

        if state.is_closed {
            return Err(Error::AccountClosed);
        }

        state.is_closed = true;
        Ok(state.balance)
    }

    pub fn snapshot(&self) -> AccountRecord {
        *self.lock()
    }

    // Every mutation is a single assignment after its checks, so a poisoned
    // lock still guards a consistent record.
    fn lock(&self) -> MutexGuard<'_, AccountRecord> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
