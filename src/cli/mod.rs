use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "idv-register")]
#[command(about = "Register users against an identity verification backend")]
#[command(long_about = "idv-register drives the registration workflow from image files \
                       on disk: it creates the user record, uploads the selfie, then runs \
                       ID card verification. Use 'idv-register detect-text' to preview \
                       the text found on an ID card.")]
pub struct Cli {
    /// Configuration file to load instead of the default lookup
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect text lines on an ID card image
    DetectText {
        /// ID card image to scan
        #[arg(long, help = "Image file of the ID card")]
        id_card: PathBuf,
    },
    /// Submit a full registration
    Register {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Date of birth as entered on the form
        #[arg(long)]
        dob: String,
        /// Selfie frame
        #[arg(long, help = "Image file used as the captured selfie")]
        selfie: PathBuf,
        /// ID card frame used for verification
        #[arg(long, help = "Image file used as the captured ID card")]
        id_card_capture: PathBuf,
        /// ID card file as uploaded; defaults to the captured frame
        #[arg(long, help = "Image file used as the uploaded ID card")]
        id_card_upload: Option<PathBuf>,
    },
    /// Write the default configuration to a file
    InitConfig {
        #[arg(long, default_value = "idv-register.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
