pub mod account;
pub mod error;
pub mod traits;

pub use account::{Account, AccountRecord};
pub use error::Error;
pub use traits::AccountRepository;
