use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "dataroom: an end-to-end encrypted directory with non-interactive key rotation", long_about = None)]
pub struct Cli {
    /// Path to the secret-key file.
    #[arg(short = 's', long = "secret-key", global = true, default_value = "secretkey")]
    pub secret_key: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty dataroom and its secret key file
    Mkdr {
        dataroom: PathBuf,
    },

    /// Encrypt and add a file to the dataroom
    Upload {
        file: PathBuf,
        dataroom: PathBuf,
    },

    /// List the plaintext file names registered in the dataroom
    Ls {
        dataroom: PathBuf,
    },

    /// Decrypt a file from the dataroom into a destination directory
    Download {
        /// `<dataroom>/<plaintext file name>`
        file: PathBuf,
        dest: PathBuf,
    },

    /// Sample a new secret key and stage a rotation factor for `rekey`
    Keyrotate {
        dataroom: PathBuf,
    },

    /// Apply a staged rotation factor to the dataroom's encapsulation element
    Rekey {
        dataroom: PathBuf,
    },
}
