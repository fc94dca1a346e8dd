//! File-storage collaborator: per-order deliverable folders.
//!
//! The [`FileStore`] trait is the seam the folder-creation handler depends
//! on; the REST implementation (refresh-token OAuth plus the folder and
//! sharing endpoints) lives in [`client`].

mod client;
mod error;

use async_trait::async_trait;

pub use client::DropboxClient;
pub use error::DropboxError;

/// Folder and shared-link operations on the storage provider.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Creates a folder at `path`, renaming on collision rather than
    /// failing.
    async fn create_folder(&self, path: &str) -> Result<(), DropboxError>;

    /// Creates a public shared link for `path`, or returns the existing one
    /// when the provider reports the link already exists.
    async fn create_shared_link(&self, path: &str) -> Result<String, DropboxError>;
}
