mod application;
mod presentation;

use dataroom_core::error::Error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info"),
        ))
        .init();

    match application::run() {
        Ok(()) => {}
        Err(Error::AlreadyExists(what)) => {
            println!("{what} already exists");
            std::process::exit(0);
        }
        Err(Error::NotFound(what)) => {
            println!("{what} not found");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
