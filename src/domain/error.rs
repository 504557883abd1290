#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("Not enough money: balance {balance}, requested change {amount}")]
    InsufficientFunds { balance: i64, amount: i64 },

    #[error("Account is closed")]
    AccountClosed,

    #[error("Account is not created")]
    NotFound,

    #[error("Stored account record is corrupt: open with negative balance {0}")]
    CorruptRecord(i64),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Account record serialization failed with: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Business-rule violations the caller can fix; everything else is a storage fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::InsufficientFunds { .. }
                | Error::AccountClosed
                | Error::NotFound
        )
    }
}
