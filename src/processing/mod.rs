pub mod naming;
pub mod upload;

pub use naming::{derive_container_name, is_valid_container_name};
pub use upload::{PhotoWrite, UploadHandler, UploadReport};
