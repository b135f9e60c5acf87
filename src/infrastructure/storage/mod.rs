//! Storage for uploaded profile and hotel images.

mod local;
mod service;

pub use local::LocalImageStore;
pub use service::{ImageStore, StorageError, UploadedImage};

#[cfg(test)]
pub use service::MockImageStore;
