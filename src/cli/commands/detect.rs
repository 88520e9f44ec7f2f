use anyhow::Result;
use std::path::PathBuf;

use super::{connect, file_name, read_image};
use crate::config::RegistrationConfig;
use crate::registration::UploadedImage;

pub struct DetectTextCommand {
    pub id_card: PathBuf,
}

impl DetectTextCommand {
    pub fn new(id_card: PathBuf) -> Self {
        Self { id_card }
    }

    pub async fn execute(&self, config: &RegistrationConfig) -> Result<()> {
        let session = connect(config)?;
        let data_url = read_image(&self.id_card).await?;

        print!("🔍 Detecting text on {}... ", self.id_card.display());
        std::io::Write::flush(&mut std::io::stdout())?;

        session
            .on_id_card_uploaded(UploadedImage::new(file_name(&self.id_card), data_url))
            .await?;

        let candidates = session.state().detected_text;
        if candidates.is_empty() {
            println!("no text found");
            return Ok(());
        }

        println!("✅ {} line(s)", candidates.len());
        for (index, text) in candidates.iter().enumerate() {
            println!("  [{index}] {text}");
        }
        Ok(())
    }
}
