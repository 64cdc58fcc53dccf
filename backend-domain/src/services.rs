// Domain services

pub mod progress_parser;

pub use progress_parser::*;
