pub mod metadata;

pub use metadata::{ContainerName, ContainerNameSource, UploadRequest};
