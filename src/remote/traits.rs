// Remote service boundary - injected into the registration session for testability

use async_trait::async_trait;

use super::errors::RemoteError;
use super::types::{DetectedText, RecordId, UploadReceipt, UserRecord, VerificationResult};

/// Operations the registration workflow needs from the backend.
///
/// Implementations own transport, authentication and storage layout; the
/// workflow only sequences the calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteServiceClient: Send + Sync {
    /// Persist a new user record ahead of verification
    async fn create_user_record(&self, record: &UserRecord) -> Result<RecordId, RemoteError>;

    /// Store raw bytes under `key` in object storage
    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, RemoteError>;

    /// Run text detection over a base64 encoded ID card image
    async fn detect_id_card_text(&self, image_base64: &str) -> Result<DetectedText, RemoteError>;

    /// Run the identity verification workflow for a created record
    async fn register_user_with_id_card(
        &self,
        user_json: &str,
        face_image_base64: &str,
        id_image_base64: &str,
    ) -> Result<VerificationResult, RemoteError>;

    /// Remove a record whose registration did not complete
    async fn delete_user(&self, user_json: &str) -> Result<(), RemoteError>;
}
