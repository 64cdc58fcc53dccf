pub mod ops_handlers;
pub mod sync_handlers;

pub use ops_handlers::*;
pub use sync_handlers::*;
