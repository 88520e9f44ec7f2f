// Core types for the registration workflow

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Terminal vs in-progress registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[default]
    Initial,
    Success,
}

/// Text fields a detected text candidate can be pasted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextField {
    UserId,
    FirstName,
    LastName,
    DateOfBirth,
}

/// Every field `SetField` can overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    UserId,
    FirstName,
    LastName,
    DateOfBirth,
    SelfieImage,
    IdCardImage,
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::UserId => Field::UserId,
            TextField::FirstName => Field::FirstName,
            TextField::LastName => Field::LastName,
            TextField::DateOfBirth => Field::DateOfBirth,
        }
    }
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::UserId,
        TextField::FirstName,
        TextField::LastName,
        TextField::DateOfBirth,
    ];

    /// Form label shown next to the field
    pub fn label(&self) -> &'static str {
        match self {
            TextField::UserId => "User Id",
            TextField::FirstName => "First name",
            TextField::LastName => "Last name",
            TextField::DateOfBirth => "Date of birth",
        }
    }

    pub(crate) fn parse(name: &str) -> Option<Self> {
        match name {
            "userId" => Some(TextField::UserId),
            "firstName" => Some(TextField::FirstName),
            "lastName" => Some(TextField::LastName),
            "dateOfBirth" => Some(TextField::DateOfBirth),
            _ => None,
        }
    }
}

/// An image handed over by the upload widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub file_name: String,
    /// `data:<mime>;base64,<body>` as produced by the widget
    pub data_url: String,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            data_url: data_url.into(),
        }
    }
}

/// Errors from turning an image data URL into bytes
#[derive(Debug, thiserror::Error)]
pub enum ImagePayloadError {
    #[error("image payload is empty")]
    Empty,
    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Helpers over `data:` URLs holding captured or uploaded images
pub struct ImagePayload;

impl ImagePayload {
    /// Base64 body of a data URL; a string without a comma is taken as a bare body
    pub fn base64_body(data_url: &str) -> &str {
        match data_url.split_once(',') {
            Some((_, body)) => body,
            None => data_url,
        }
    }

    /// Decode the image bytes carried by a data URL
    pub fn decode(data_url: &str) -> Result<Vec<u8>, ImagePayloadError> {
        let body = Self::base64_body(data_url);
        if body.is_empty() {
            return Err(ImagePayloadError::Empty);
        }
        Ok(STANDARD.decode(body)?)
    }

    /// Build a data URL from raw bytes
    pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
    }
}

/// Complete state of one registration form.
///
/// Owned by the store and replaced whole on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub selfie_image: String,
    pub id_card_image: String,
    pub uploaded_id_card: Option<UploadedImage>,
    pub status: RegistrationStatus,
    pub busy: bool,
    pub error_message: String,
    pub detected_text: Vec<String>,
    pub text_picker_visible: bool,
    pub text_picker_button_visible: bool,
    pub text_picker_target: Option<TextField>,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::UserId => &self.user_id,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::DateOfBirth => &self.date_of_birth,
            Field::SelfieImage => &self.selfie_image,
            Field::IdCardImage => &self.id_card_image,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::UserId => &mut self.user_id,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::DateOfBirth => &mut self.date_of_birth,
            Field::SelfieImage => &mut self.selfie_image,
            Field::IdCardImage => &mut self.id_card_image,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RegistrationStatus::Success
    }
}
