// Registration reducer - pure state transitions over a closed action set

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Field, RegistrationState, RegistrationStatus, TextField, UploadedImage};

/// Separator used when detected text lines travel as a single string
pub const DETECTED_TEXT_DELIMITER: &str = "|";

/// Transitions the registration state machine reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    SetField(Field, String),
    SetUploadedIdCard(Option<UploadedImage>),
    SetBusy(bool),
    SetError(String),
    Reset,
    MarkSuccess,
    SetDetectedText(String),
    SetShowTextPicker(bool),
    SetShowTextPickerButton(bool),
    SetTextPickerTarget(Option<TextField>),
}

/// Which camera capture a capture/retake event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    Selfie,
    IdCard,
}

impl CaptureTarget {
    fn field(self) -> Field {
        match self {
            CaptureTarget::Selfie => Field::SelfieImage,
            CaptureTarget::IdCard => Field::IdCardImage,
        }
    }
}

impl Action {
    /// Store a captured frame
    pub fn capture(target: CaptureTarget, data_url: impl Into<String>) -> Self {
        Action::SetField(target.field(), data_url.into())
    }

    /// Discard a captured frame so the camera is shown again
    pub fn retake(target: CaptureTarget) -> Self {
        Action::SetField(target.field(), String::new())
    }
}

/// String-keyed action as emitted by a presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    pub kind: String,
    pub payload: String,
}

impl RawAction {
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Typed form of this action, or `None` when the kind is not one we react to
    pub fn parse(&self) -> Option<Action> {
        let flag = || self.payload == "true";
        let text = || self.payload.clone();

        let action = match self.kind.as_str() {
            "userId" => Action::SetField(Field::UserId, text()),
            "firstName" => Action::SetField(Field::FirstName, text()),
            "lastName" => Action::SetField(Field::LastName, text()),
            "dateOfBirth" => Action::SetField(Field::DateOfBirth, text()),
            "selfieImage" => Action::SetField(Field::SelfieImage, text()),
            "idCardImage" => Action::SetField(Field::IdCardImage, text()),
            // Payload is the uploaded file's data URL; empty clears the upload
            "idCard" => Action::SetUploadedIdCard(
                (!self.payload.is_empty()).then(|| UploadedImage::new("", text())),
            ),
            "busy" => Action::SetBusy(flag()),
            "errorMessage" => Action::SetError(text()),
            "reset" => Action::Reset,
            "success" => Action::MarkSuccess,
            "detectedText" => Action::SetDetectedText(text()),
            "showTextPicker" => Action::SetShowTextPicker(flag()),
            "showTextPickerButton" => Action::SetShowTextPickerButton(flag()),
            "textPickerTarget" => Action::SetTextPickerTarget(TextField::parse(&self.payload)),
            _ => return None,
        };
        Some(action)
    }
}

/// Split a delimited detected-text string into candidates
pub fn split_detected_text(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(DETECTED_TEXT_DELIMITER).map(str::to_string).collect()
}

/// Apply one action, producing the next state.
///
/// Deterministic and side-effect free; fields an action does not name are
/// carried over unchanged.
pub fn apply(state: &RegistrationState, action: Action) -> RegistrationState {
    let mut next = state.clone();
    match action {
        Action::SetField(field, value) => *next.field_mut(field) = value,
        Action::SetUploadedIdCard(file) => next.uploaded_id_card = file,
        Action::SetBusy(busy) => next.busy = busy,
        Action::SetError(message) => next.error_message = message,
        Action::Reset => return RegistrationState::default(),
        Action::MarkSuccess => {
            next.status = RegistrationStatus::Success;
            next.busy = false;
        }
        Action::SetDetectedText(text) => next.detected_text = split_detected_text(&text),
        Action::SetShowTextPicker(visible) => next.text_picker_visible = visible,
        Action::SetShowTextPickerButton(visible) => next.text_picker_button_visible = visible,
        Action::SetTextPickerTarget(target) => next.text_picker_target = target,
    }
    next
}

/// Apply a string-keyed action; unknown kinds leave the state as it was
pub fn dispatch_raw(state: &RegistrationState, raw: &RawAction) -> RegistrationState {
    match raw.parse() {
        Some(action) => apply(state, action),
        None => {
            debug!(kind = %raw.kind, "Ignoring unhandled registration action kind");
            state.clone()
        }
    }
}

/// Show the detected-text picker for a given destination field
pub fn open_text_picker(state: &RegistrationState, target: TextField) -> RegistrationState {
    let next = apply(state, Action::SetTextPickerTarget(Some(target)));
    apply(&next, Action::SetShowTextPicker(true))
}

/// Hide the picker without choosing a candidate
pub fn close_text_picker(state: &RegistrationState) -> RegistrationState {
    apply(state, Action::SetShowTextPicker(false))
}

/// Write the chosen candidate into the picker's target field and hide the picker.
///
/// Without a target or with an out-of-range index nothing is written.
pub fn select_text(state: &RegistrationState, candidate_index: usize) -> RegistrationState {
    let chosen = state
        .text_picker_target
        .zip(state.detected_text.get(candidate_index).cloned());

    let next = match chosen {
        Some((target, text)) => apply(state, Action::SetField(target.into(), text)),
        None => {
            debug!(
                index = candidate_index,
                candidates = state.detected_text.len(),
                target = ?state.text_picker_target,
                "No detected text written"
            );
            state.clone()
        }
    };
    close_text_picker(&next)
}
