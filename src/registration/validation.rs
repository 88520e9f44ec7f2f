// Required-field checks run before a submission touches the backend

use serde::Serialize;

use super::types::RegistrationState;

/// Message shown when any required field or image is missing
pub const VALIDATION_MESSAGE: &str = "please complete all fields and supply both images";

/// Inputs a registration cannot go ahead without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequiredField {
    FirstName,
    LastName,
    DateOfBirth,
    SelfieImage,
    IdCardImage,
    UploadedIdCard,
    UserId,
}

/// Every missing required field, in check order
pub fn missing_fields(state: &RegistrationState) -> Vec<RequiredField> {
    let checks = [
        (RequiredField::FirstName, !state.first_name.is_empty()),
        (RequiredField::LastName, !state.last_name.is_empty()),
        (RequiredField::DateOfBirth, !state.date_of_birth.is_empty()),
        (RequiredField::SelfieImage, !state.selfie_image.is_empty()),
        (RequiredField::IdCardImage, !state.id_card_image.is_empty()),
        (RequiredField::UploadedIdCard, state.uploaded_id_card.is_some()),
        (RequiredField::UserId, !state.user_id.is_empty()),
    ];

    checks
        .into_iter()
        .filter_map(|(field, present)| (!present).then_some(field))
        .collect()
}

/// True when every required field and both images are present
pub fn validate(state: &RegistrationState) -> bool {
    missing_fields(state).is_empty()
}
