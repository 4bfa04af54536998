//! Photo upload service: accepts a person's photos as JSON and stores each one
//! as a blob in a container named after that person.

pub mod api;
pub mod config;
pub mod error;
pub mod meta;
pub mod monitoring;
pub mod processing;
pub mod storage;

pub use config::UploadConfig;
pub use error::{Result, UploadError};
pub use processing::{UploadHandler, UploadReport};
