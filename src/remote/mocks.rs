// Recording remote client for tests - no network, scripted responses

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::errors::RemoteError;
use super::traits::RemoteServiceClient;
use super::types::{DetectedText, RecordId, UploadReceipt, UserRecord, VerificationResult};

/// Calls observed by the recording client, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    CreateUserRecord { record: UserRecord },
    UploadBlob { key: String, len: usize, content_type: String },
    DetectIdCardText { image_base64: String },
    RegisterUserWithIdCard {
        user_json: String,
        face_image_base64: String,
        id_image_base64: String,
    },
    DeleteUser { user_json: String },
}

/// Remote client whose responses are configured up front.
///
/// Every operation succeeds by default; use the `set_*` methods to script
/// failures or alternate payloads.
#[derive(Debug)]
pub struct RecordingRemoteClient {
    create_response: Mutex<Result<RecordId, RemoteError>>,
    upload_response: Mutex<Option<Result<UploadReceipt, RemoteError>>>,
    detect_responses: Mutex<VecDeque<Result<DetectedText, RemoteError>>>,
    verify_response: Mutex<Result<VerificationResult, RemoteError>>,
    delete_response: Mutex<Result<(), RemoteError>>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl Default for RecordingRemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRemoteClient {
    pub fn new() -> Self {
        Self {
            create_response: Mutex::new(Ok(RecordId("record-1".to_string()))),
            upload_response: Mutex::new(None),
            detect_responses: Mutex::new(VecDeque::new()),
            verify_response: Mutex::new(Ok(VerificationResult::accepted())),
            delete_response: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_create_response(&self, response: Result<RecordId, RemoteError>) {
        *self.create_response.lock().unwrap() = response;
    }

    pub fn set_upload_response(&self, response: Result<UploadReceipt, RemoteError>) {
        *self.upload_response.lock().unwrap() = Some(response);
    }

    pub fn push_detect_response(&self, response: Result<DetectedText, RemoteError>) {
        self.detect_responses.lock().unwrap().push_back(response);
    }

    pub fn set_verify_response(&self, response: Result<VerificationResult, RemoteError>) {
        *self.verify_response.lock().unwrap() = response;
    }

    pub fn set_delete_response(&self, response: Result<(), RemoteError>) {
        *self.delete_response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RemoteCall::DeleteUser { user_json } => Some(user_json),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteServiceClient for RecordingRemoteClient {
    async fn create_user_record(&self, record: &UserRecord) -> Result<RecordId, RemoteError> {
        self.record(RemoteCall::CreateUserRecord {
            record: record.clone(),
        });
        self.create_response.lock().unwrap().clone()
    }

    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, RemoteError> {
        self.record(RemoteCall::UploadBlob {
            key: key.to_string(),
            len: bytes.len(),
            content_type: content_type.to_string(),
        });
        self.upload_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(UploadReceipt::stored(key)))
    }

    async fn detect_id_card_text(&self, image_base64: &str) -> Result<DetectedText, RemoteError> {
        self.record(RemoteCall::DetectIdCardText {
            image_base64: image_base64.to_string(),
        });
        self.detect_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DetectedText::default()))
    }

    async fn register_user_with_id_card(
        &self,
        user_json: &str,
        face_image_base64: &str,
        id_image_base64: &str,
    ) -> Result<VerificationResult, RemoteError> {
        self.record(RemoteCall::RegisterUserWithIdCard {
            user_json: user_json.to_string(),
            face_image_base64: face_image_base64.to_string(),
            id_image_base64: id_image_base64.to_string(),
        });
        self.verify_response.lock().unwrap().clone()
    }

    async fn delete_user(&self, user_json: &str) -> Result<(), RemoteError> {
        self.record(RemoteCall::DeleteUser {
            user_json: user_json.to_string(),
        });
        self.delete_response.lock().unwrap().clone()
    }
}
