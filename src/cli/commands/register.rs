use anyhow::{bail, Result};
use std::path::PathBuf;

use super::{connect, file_name, read_image};
use crate::config::RegistrationConfig;
use crate::registration::{
    Action, CaptureTarget, RegistrationView, SubmitOutcome, TextField, UploadedImage,
};

pub struct RegisterCommand {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub selfie: PathBuf,
    pub id_card_capture: PathBuf,
    pub id_card_upload: Option<PathBuf>,
}

impl RegisterCommand {
    pub async fn execute(&self, config: &RegistrationConfig) -> Result<()> {
        let session = connect(config)?;

        session.set_text(TextField::UserId, &self.user_id);
        session.set_text(TextField::FirstName, &self.first_name);
        session.set_text(TextField::LastName, &self.last_name);
        session.set_text(TextField::DateOfBirth, &self.dob);
        session.capture(CaptureTarget::Selfie, read_image(&self.selfie).await?);
        session.capture(CaptureTarget::IdCard, read_image(&self.id_card_capture).await?);

        let upload_path = self.id_card_upload.as_ref().unwrap_or(&self.id_card_capture);
        let upload = UploadedImage::new(file_name(upload_path), read_image(upload_path).await?);
        // Detection is only a form helper; the CLI does not wait for it
        session.dispatch(Action::SetUploadedIdCard(Some(upload)));

        println!("📝 Registering {}...", self.user_id);
        let outcome = session.submit().await;
        let view = session.view();

        match outcome {
            SubmitOutcome::Registered { record_id } => {
                println!("✅ Registered (record {record_id})");
                print_summary(&view);
                Ok(())
            }
            SubmitOutcome::UploadRejected => {
                bail!(
                    "face image upload was not confirmed; record for {} was left in place",
                    self.user_id
                )
            }
            SubmitOutcome::AlreadyInFlight => bail!("a registration is already running"),
            SubmitOutcome::ValidationFailed { .. }
            | SubmitOutcome::VerificationRejected { .. }
            | SubmitOutcome::Failed { .. } => {
                bail!("{}", view.alert.unwrap_or_else(|| "registration failed".to_string()))
            }
        }
    }
}

fn print_summary(view: &RegistrationView) {
    if let Some(rows) = &view.summary {
        for row in rows {
            println!("   {:<12} {}", row.header, row.value);
        }
    }
}
