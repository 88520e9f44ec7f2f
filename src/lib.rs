// idv-register library - identity verification registration workflow
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod registration;
pub mod remote;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{ObservabilityConfig, RegistrationConfig, RemoteConfig, WorkflowConfig};
pub use registration::{
    apply, dispatch_raw, missing_fields, select_text, validate, Action, CaptureTarget, Field,
    ImagePayload, RawAction, RegistrationError, RegistrationSession, RegistrationState,
    RegistrationStatus, RegistrationView, StateStore, SubmitOutcome, TextField, UploadedImage,
};
pub use remote::{
    DetectedText, GraphQlRemoteClient, RecordId, RemoteError, RemoteServiceClient, UploadReceipt,
    UserRecord, VerificationResult,
};
pub use telemetry::{create_registration_span, generate_correlation_id, init_telemetry};
