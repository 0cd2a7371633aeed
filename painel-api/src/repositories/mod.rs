mod memory;
mod postgres;
mod repo_error;

pub use memory::*;
pub use postgres::*;
pub use repo_error::RepositoryError;
