pub mod error;
pub mod pdf;
pub mod upload;
