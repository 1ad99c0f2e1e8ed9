pub mod domain;
pub mod infrastructure;
pub mod interface;

use crate::infrastructure::loader::LoadError;

// Northwind API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// API result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Server error: {0}")]
    Server(String),
}
