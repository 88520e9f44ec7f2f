// Registration orchestration - sequences the remote calls and commits state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

use super::state_machine::{self, Action, CaptureTarget, RawAction, DETECTED_TEXT_DELIMITER};
use super::store::StateStore;
use super::types::{ImagePayload, ImagePayloadError, RegistrationState, TextField, UploadedImage};
use super::validation::{missing_fields, RequiredField, VALIDATION_MESSAGE};
use super::view::RegistrationView;
use crate::config::WorkflowConfig;
use crate::remote::{RecordId, RemoteError, RemoteServiceClient, UserRecord};
use crate::telemetry::{create_registration_span, generate_correlation_id};

/// Prefix of the message shown for any unexpected submission failure
pub const UNEXPECTED_FAILURE_PREFIX: &str = "possible duplicate key: ";

/// Failures that abort a submission after it started calling the backend
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("could not read selfie image: {0}")]
    ImagePayload(#[from] ImagePayloadError),
    #[error("could not serialize user record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How a call to [`RegistrationSession::submit`] ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Another submission was still running; nothing was done
    AlreadyInFlight,
    /// Required input missing; no remote calls were made
    ValidationFailed { missing: Vec<RequiredField> },
    /// The object store did not confirm the face image; the record is left in place
    UploadRejected,
    /// Verification said no; the record was deleted again
    VerificationRejected { message: String },
    /// All three steps succeeded
    Registered { record_id: RecordId },
    /// An error escaped one of the remote steps
    Failed { error: RegistrationError },
}

impl SubmitOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, SubmitOutcome::Registered { .. })
    }
}

/// Clears the in-flight flag however the submission exits
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One registration form bound to a remote service client
pub struct RegistrationSession {
    client: Arc<dyn RemoteServiceClient>,
    store: StateStore,
    workflow: WorkflowConfig,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for RegistrationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationSession")
            .field("state", &self.store.snapshot())
            .field("workflow", &self.workflow)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish()
    }
}

impl RegistrationSession {
    pub fn new(client: Arc<dyn RemoteServiceClient>, workflow: WorkflowConfig) -> Self {
        Self {
            client,
            store: StateStore::default(),
            workflow,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.store.snapshot()
    }

    pub fn view(&self) -> RegistrationView {
        RegistrationView::from_state(&self.store.snapshot())
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn dispatch_raw(&self, raw: &RawAction) {
        self.store.dispatch_raw(raw);
    }

    pub fn set_text(&self, field: TextField, value: impl Into<String>) {
        self.store.dispatch(Action::SetField(field.into(), value.into()));
    }

    pub fn capture(&self, target: CaptureTarget, data_url: impl Into<String>) {
        self.store.dispatch(Action::capture(target, data_url));
    }

    pub fn retake(&self, target: CaptureTarget) {
        self.store.dispatch(Action::retake(target));
    }

    pub fn reset(&self) {
        self.store.dispatch(Action::Reset);
    }

    pub fn open_text_picker(&self, target: TextField) {
        self.store.update(|state| state_machine::open_text_picker(state, target));
    }

    pub fn close_text_picker(&self) {
        self.store.update(state_machine::close_text_picker);
    }

    pub fn select_text(&self, candidate_index: usize) {
        self.store
            .update(|state| state_machine::select_text(state, candidate_index));
    }

    /// Record the uploaded ID card and start detecting text on it
    pub fn on_id_card_uploaded(&self, file: UploadedImage) -> JoinHandle<()> {
        let image_base64 = ImagePayload::base64_body(&file.data_url).to_string();
        self.store.dispatch(Action::SetUploadedIdCard(Some(file)));
        self.detect_text(image_base64)
    }

    /// Start text detection on an ID card image in a detached task.
    ///
    /// Prior candidates are cleared before the call. The task never reports
    /// failure: on error or an empty result the candidates simply stay empty.
    /// Results are dropped if another detection started or the form was reset
    /// in the meantime. Must be called from within a Tokio runtime.
    pub fn detect_text(&self, image_base64: impl Into<String>) -> JoinHandle<()> {
        let generation = self.store.begin_detection();
        self.store.dispatch(Action::SetDetectedText(String::new()));
        self.store.dispatch(Action::SetShowTextPickerButton(false));

        let client = Arc::clone(&self.client);
        let store = self.store.clone();
        let image_base64 = image_base64.into();
        let span = tracing::debug_span!("detect_id_card_text");

        tokio::spawn(run_text_detection(client, store, generation, image_base64).instrument(span))
    }

    /// Run the create / upload / verify sequence against the current state.
    ///
    /// Overlapping calls on the same session return
    /// [`SubmitOutcome::AlreadyInFlight`]. No remote call carries a timeout
    /// here; a hung backend keeps the session busy.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Submission ignored: a registration is already in flight");
            return SubmitOutcome::AlreadyInFlight;
        };

        let state = self.store.snapshot();
        let missing = missing_fields(&state);
        if !missing.is_empty() {
            debug!(missing = ?missing, "Registration form incomplete");
            self.store.dispatch(Action::SetError(VALIDATION_MESSAGE.to_string()));
            return SubmitOutcome::ValidationFailed { missing };
        }

        let correlation_id = generate_correlation_id();
        let span = create_registration_span(&state.user_id, &correlation_id);
        self.run_submission(state).instrument(span).await
    }

    async fn run_submission(&self, state: RegistrationState) -> SubmitOutcome {
        self.store.dispatch(Action::SetError(String::new()));
        self.store.dispatch(Action::SetBusy(true));

        match self.register(&state).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "Registration failed");
                self.store
                    .dispatch(Action::SetError(format!("{UNEXPECTED_FAILURE_PREFIX}{err}")));
                self.store.dispatch(Action::SetBusy(false));
                SubmitOutcome::Failed { error: err }
            }
        }
    }

    fn build_record(&self, state: &RegistrationState) -> UserRecord {
        UserRecord {
            tenant_id: self.workflow.tenant_id.clone(),
            user_id: state.user_id.clone(),
            first_name: state.first_name.clone(),
            last_name: state.last_name.clone(),
            dob: state.date_of_birth.clone(),
            registration_status: self.workflow.initial_registration_status.clone(),
            face_image_key: self.workflow.face_image_key(&state.user_id),
        }
    }

    async fn register(
        &self,
        state: &RegistrationState,
    ) -> Result<SubmitOutcome, RegistrationError> {
        let record = self.build_record(state);

        let record_id = self.client.create_user_record(&record).await?;
        info!(record_id = %record_id, "User record created");

        let face_bytes = ImagePayload::decode(&state.selfie_image)?;
        let receipt = self
            .client
            .upload_blob(
                &record.face_image_key,
                face_bytes,
                &self.workflow.face_image_content_type,
            )
            .await?;

        if !receipt.has_valid_key() {
            // Record stays behind and no message is shown
            warn!(key = %record.face_image_key, "Unable to upload face image");
            self.store.dispatch(Action::SetBusy(false));
            return Ok(SubmitOutcome::UploadRejected);
        }

        let user_json = record.to_json()?;
        let verification = self
            .client
            .register_user_with_id_card(
                &user_json,
                ImagePayload::base64_body(&state.selfie_image),
                ImagePayload::base64_body(&state.id_card_image),
            )
            .await?;

        if !verification.success {
            info!(
                reason = %verification.message,
                "Verification rejected, cleaning up incomplete registration"
            );
            self.client.delete_user(&user_json).await?;
            info!("Incomplete registration removed");

            self.store
                .dispatch(Action::SetError(verification.message.clone()));
            self.store.dispatch(Action::SetBusy(false));
            return Ok(SubmitOutcome::VerificationRejected {
                message: verification.message,
            });
        }

        self.store.dispatch(Action::MarkSuccess);
        info!(user_id = %record.user_id, "User registered");
        Ok(SubmitOutcome::Registered { record_id })
    }
}

/// Body of the detached detection task; every failure ends here
async fn run_text_detection(
    client: Arc<dyn RemoteServiceClient>,
    store: StateStore,
    generation: u64,
    image_base64: String,
) {
    match client.detect_id_card_text(&image_base64).await {
        Ok(detected) if !detected.detected_text.is_empty() => {
            let lines = detected.detected_text.len();
            let joined = detected.detected_text.join(DETECTED_TEXT_DELIMITER);
            let applied = store.commit_detection(
                generation,
                [
                    Action::SetDetectedText(joined),
                    Action::SetShowTextPickerButton(true),
                ],
            );
            if applied {
                debug!(lines, "Detected text on ID card");
            } else {
                debug!(lines, generation, "Discarding detected text from a superseded detection");
            }
        }
        Ok(_) => debug!("No text detected on ID card"),
        Err(err) => debug!(error = %err, "Text detection failed, continuing without candidates"),
    }
}
