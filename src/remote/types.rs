// Payloads exchanged with the registration backend

use serde::{Deserialize, Serialize};

/// Identifier returned by the backend after a record is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User record persisted before verification runs.
///
/// Field names on the wire follow the backend table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "companyid")]
    pub tenant_id: String,
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub dob: String,
    #[serde(rename = "registrationstatus")]
    pub registration_status: String,
    #[serde(rename = "faceimage")]
    pub face_image_key: String,
}

impl UserRecord {
    /// Serialized form passed to the verification and delete operations
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of an object-store upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub key: Option<String>,
}

impl UploadReceipt {
    pub fn stored(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// An upload only counts when the store echoed back a non-empty key
    pub fn has_valid_key(&self) -> bool {
        self.key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

/// Text lines found on an ID card image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedText {
    #[serde(rename = "DetectedText", default)]
    pub detected_text: Vec<String>,
}

/// Outcome of the identity verification workflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(rename = "Success", default)]
    pub success: bool,
    #[serde(rename = "Message", default)]
    pub message: String,
}

impl VerificationResult {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
