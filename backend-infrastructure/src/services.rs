pub mod health_service;
pub mod local_storage;
pub mod rsync_tool;

pub use health_service::*;
pub use local_storage::*;
pub use rsync_tool::*;
