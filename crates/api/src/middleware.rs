/// Error mapping shared by handlers and layers
pub mod error_handling;
