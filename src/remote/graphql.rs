use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::errors::RemoteError;
use super::operations;
use super::traits::RemoteServiceClient;
use super::types::{DetectedText, RecordId, UploadReceipt, UserRecord, VerificationResult};
use crate::config::RemoteConfig;

/// Remote service client speaking GraphQL over HTTPS, with blob uploads sent
/// as plain HTTP `PUT`s to an object-store endpoint.
#[derive(Debug)]
pub struct GraphQlRemoteClient {
    http: reqwest::Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    graphql_endpoint: String,
    storage_endpoint: String,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateUserInfoData {
    #[serde(rename = "createUserInfo")]
    create_user_info: Option<CreatedUserInfo>,
}

#[derive(Debug, Deserialize)]
struct CreatedUserInfo {
    userid: String,
}

#[derive(Debug, Deserialize)]
struct DetectTextData {
    detecttextinidcard: Option<DetectedText>,
}

#[derive(Debug, Deserialize)]
struct RegisterUserData {
    registernewuserwithidcard: Option<VerificationResult>,
}

#[derive(Debug, Deserialize)]
struct DeleteUserData {
    #[allow(dead_code)]
    deleteuser: Option<Value>,
}

impl GraphQlRemoteClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_capacity).unwrap_or(per_second);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder.build()?;

        info!(
            endpoint = %config.graphql_endpoint,
            storage = %config.storage_endpoint,
            "Remote service client configured"
        );

        Ok(Self {
            http,
            rate_limiter,
            graphql_endpoint: config.graphql_endpoint.clone(),
            storage_endpoint: config.storage_endpoint.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, token),
            None => request,
        }
    }

    async fn wait_for_permit(&self) {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;
    }

    /// Execute a GraphQL document and decode its `data` member
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, RemoteError> {
        self.wait_for_permit().await;

        let body = json!({ "query": query, "variables": variables });
        let response = self
            .authorize(self.http.post(&self.graphql_endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), text));
        }

        let parsed: GraphQlResponse<T> = response.json().await?;
        if !parsed.errors.is_empty() {
            return Err(classify_graphql_errors(parsed.errors));
        }

        parsed.data.ok_or_else(|| {
            RemoteError::invalid_response("response carried neither data nor errors")
        })
    }
}

fn status_error(status: u16, body: String) -> RemoteError {
    match status {
        401 | 403 => RemoteError::Unauthorized { message: body },
        _ => RemoteError::Http { status, body },
    }
}

/// Map GraphQL error entries onto structured error kinds
fn classify_graphql_errors(errors: Vec<GraphQlErrorEntry>) -> RemoteError {
    let has_type = |needle: &str| {
        errors
            .iter()
            .any(|e| e.error_type.as_deref().is_some_and(|t| t.contains(needle)))
    };
    let joined = || {
        errors
            .iter()
            .map(|e| e.message.clone())
            .collect::<Vec<_>>()
            .join("; ")
    };

    if has_type("ConditionalCheckFailed") {
        RemoteError::Conflict { message: joined() }
    } else if has_type("Unauthorized") {
        RemoteError::Unauthorized { message: joined() }
    } else {
        RemoteError::GraphQl {
            messages: errors.into_iter().map(|e| e.message).collect(),
        }
    }
}

#[async_trait]
impl RemoteServiceClient for GraphQlRemoteClient {
    async fn create_user_record(&self, record: &UserRecord) -> Result<RecordId, RemoteError> {
        debug!(user_id = %record.user_id, "Creating user record");
        let data: CreateUserInfoData = self
            .execute(operations::CREATE_USER_INFO, json!({ "input": record }))
            .await?;

        data.create_user_info
            .map(|created| RecordId(created.userid))
            .ok_or_else(|| RemoteError::invalid_response("createUserInfo returned null"))
    }

    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadReceipt, RemoteError> {
        self.wait_for_permit().await;

        let url = format!("{}/{}", self.storage_endpoint, key);
        let size = bytes.len();
        let response = self
            .authorize(self.http.put(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(key = %key, status = status.as_u16(), "Blob upload refused");
            return Err(status_error(status.as_u16(), text));
        }

        debug!(key = %key, bytes = size, "Uploaded blob");
        Ok(UploadReceipt::stored(key))
    }

    async fn detect_id_card_text(&self, image_base64: &str) -> Result<DetectedText, RemoteError> {
        let data: DetectTextData = self
            .execute(
                operations::DETECT_TEXT_IN_ID_CARD,
                json!({ "imageDataBase64": image_base64 }),
            )
            .await?;
        Ok(data.detecttextinidcard.unwrap_or_default())
    }

    async fn register_user_with_id_card(
        &self,
        user_json: &str,
        face_image_base64: &str,
        id_image_base64: &str,
    ) -> Result<VerificationResult, RemoteError> {
        let data: RegisterUserData = self
            .execute(
                operations::REGISTER_NEW_USER_WITH_ID_CARD,
                json!({
                    "userInfoAsJson": user_json,
                    "faceImageDataBase64": face_image_base64,
                    "idImageDataBase64": id_image_base64,
                }),
            )
            .await?;
        Ok(data.registernewuserwithidcard.unwrap_or_default())
    }

    async fn delete_user(&self, user_json: &str) -> Result<(), RemoteError> {
        let _: DeleteUserData = self
            .execute(operations::DELETE_USER, json!({ "userInfoAsJson": user_json }))
            .await?;
        Ok(())
    }
}
