// Presentation data derived from registration state

use serde::Serialize;

use super::types::{RegistrationState, TextField};

/// Which button a camera panel offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureControl {
    /// No frame yet: show the live camera and a capture button
    Capture,
    /// A frame is held: show it and offer a retake
    Retake,
}

impl CaptureControl {
    fn for_image(image: &str) -> Self {
        if image.is_empty() {
            CaptureControl::Capture
        } else {
            CaptureControl::Retake
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub header: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPickerView {
    pub visible: bool,
    pub target: Option<TextField>,
    pub candidates: Vec<String>,
}

/// Everything a renderer needs to draw the registration screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationView {
    pub form_visible: bool,
    pub selfie_control: CaptureControl,
    pub id_card_control: CaptureControl,
    pub paste_buttons_visible: bool,
    pub alert: Option<String>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub text_picker: TextPickerView,
    /// Present only once registration succeeded
    pub summary: Option<Vec<SummaryRow>>,
}

impl RegistrationView {
    pub fn from_state(state: &RegistrationState) -> Self {
        let summary = state.is_success().then(|| {
            vec![
                SummaryRow {
                    header: "User Id",
                    value: state.user_id.clone(),
                },
                SummaryRow {
                    header: "First name",
                    value: state.first_name.clone(),
                },
                SummaryRow {
                    header: "Last name",
                    value: state.last_name.clone(),
                },
                SummaryRow {
                    header: "DOB",
                    value: state.date_of_birth.clone(),
                },
            ]
        });

        Self {
            form_visible: !state.is_success(),
            selfie_control: CaptureControl::for_image(&state.selfie_image),
            id_card_control: CaptureControl::for_image(&state.id_card_image),
            paste_buttons_visible: state.text_picker_button_visible,
            alert: (!state.error_message.is_empty()).then(|| state.error_message.clone()),
            submit_enabled: !state.busy,
            submit_label: if state.busy { "Registering" } else { "Register" },
            text_picker: TextPickerView {
                visible: state.text_picker_visible,
                target: state.text_picker_target,
                candidates: state.detected_text.clone(),
            },
            summary,
        }
    }
}

impl From<&RegistrationState> for RegistrationView {
    fn from(state: &RegistrationState) -> Self {
        Self::from_state(state)
    }
}
