//! Publication: mirroring local report artifacts into an object store.
//!
//! The store is behind the [`ObjectStore`] trait so the pipeline and the
//! delivery endpoint can be exercised without AWS credentials; [`S3Store`]
//! is the production implementation.

pub mod publisher;
pub mod s3;
pub mod store;

pub use publisher::{PublishSummary, Publisher};
pub use s3::S3Store;
pub use store::{MemoryStore, ObjectStore};
