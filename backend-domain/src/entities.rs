// Domain entities

pub mod config;
pub mod health;
pub mod storage;
pub mod sync_job;

pub use config::*;
pub use health::*;
pub use storage::*;
pub use sync_job::*;
