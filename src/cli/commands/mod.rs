use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::config::RegistrationConfig;
use crate::registration::{ImagePayload, RegistrationSession};
use crate::remote::GraphQlRemoteClient;

pub mod detect;
pub mod init_config;
pub mod register;

/// Build a session backed by the GraphQL client described in `config`
pub fn connect(config: &RegistrationConfig) -> Result<RegistrationSession> {
    let client = GraphQlRemoteClient::new(&config.remote)
        .context("Failed to build remote service client")?;
    Ok(RegistrationSession::new(
        Arc::new(client),
        config.workflow.clone(),
    ))
}

/// Read an image file into a data URL, guessing the mime type from its extension
pub async fn read_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    Ok(ImagePayload::to_data_url(mime_for(path), &bytes))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
