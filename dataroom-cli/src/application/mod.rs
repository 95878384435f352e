pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use dataroom_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let secret_key = cli.secret_key;

    match cli.command {
        Commands::Mkdr { dataroom } => handlers::handle_mkdr(&secret_key, &dataroom),
        Commands::Upload { file, dataroom } => handlers::handle_upload(&secret_key, &file, &dataroom),
        Commands::Ls { dataroom } => handlers::handle_ls(&secret_key, &dataroom),
        Commands::Download { file, dest } => handlers::handle_download(&secret_key, &file, &dest),
        Commands::Keyrotate { dataroom } => handlers::handle_keyrotate(&secret_key, &dataroom),
        Commands::Rekey { dataroom } => handlers::handle_rekey(&dataroom),
    }
}
