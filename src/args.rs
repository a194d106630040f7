use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::DEFAULT_API_URL;
use crate::image::ImageId;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Base URL of the image server's API.
    #[arg(short, long, default_value = DEFAULT_API_URL)]
    server: String,

    /// Where the session token is kept between runs. Defaults
    /// to an `imgcrud` directory under the platform's data dir.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the gallery (or the login forms, if not logged in).
    Show,

    /// Log in and remember the session.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account, then log in with it.
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Upload an image file.
    Upload { file: PathBuf },

    /// Like an image. Likes can't be taken back.
    Like { id: ImageId },

    /// Print the URL an uploaded file is served from.
    Url { filename: String },

    /// Download an uploaded file.
    Fetch {
        filename: String,

        /// Defaults to `filename` in the current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session.
    Shell,
}

impl Args {
    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("imgcrud")))
            .unwrap_or_else(|| PathBuf::from(".imgcrud"))
    }

    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show)
    }
}
