pub mod config;
pub mod error;
pub mod types;

pub use error::{EduhireError, Result};
pub use types::UserRole;
