use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::RegistrationConfig;

pub struct InitConfigCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitConfigCommand {
    pub fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            bail!(
                "{} already exists; pass --force to overwrite",
                self.path.display()
            );
        }

        RegistrationConfig::default().save_to_file(&self.path)?;
        println!("⚙️  Wrote default configuration to {}", self.path.display());
        Ok(())
    }
}
