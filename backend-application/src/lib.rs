// Backend Application Layer

pub mod commands;
pub mod controller;
pub mod dtos;
pub mod error;
pub mod job_state;
pub mod metrics;
pub mod queries;
pub mod state;

pub use controller::SyncJobController;
pub use error::AppError;
pub use job_state::JobState;
pub use metrics::Metrics;
pub use state::AppState;
