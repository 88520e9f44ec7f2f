// Registration workflow module
//
// Pure state machine plus the orchestration that drives the remote service
// client. Rendering lives elsewhere; this module only exposes state and the
// view model derived from it.

pub mod state_machine;
pub mod store;
pub mod types;
pub mod validation;
pub mod view;
pub mod workflow;


pub use state_machine::{apply, dispatch_raw, select_text, Action, CaptureTarget, RawAction};
pub use store::StateStore;
pub use types::{
    Field, ImagePayload, RegistrationState, RegistrationStatus, TextField, UploadedImage,
};
pub use validation::{missing_fields, validate, RequiredField, VALIDATION_MESSAGE};
pub use view::{CaptureControl, RegistrationView};
pub use workflow::{
    RegistrationError, RegistrationSession, SubmitOutcome, UNEXPECTED_FAILURE_PREFIX,
};
