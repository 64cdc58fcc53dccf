// Port traits (interfaces)
// Define what the domain needs from infrastructure

pub mod services;

pub use services::*;
