//! Remote service abstractions
//!
//! The registration workflow talks to its backend only through
//! [`RemoteServiceClient`], so it can be driven by the GraphQL client in
//! production and by recording mocks in tests.

pub mod errors;
pub mod graphql;
pub mod operations;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mocks;

pub use errors::RemoteError;
pub use graphql::GraphQlRemoteClient;
pub use traits::RemoteServiceClient;
pub use types::{DetectedText, RecordId, UploadReceipt, UserRecord, VerificationResult};
