// Domain value objects
pub mod identifiers;
pub mod job_status;

pub use identifiers::*;
pub use job_status::*;
