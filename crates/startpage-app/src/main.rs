//! Main application entry point (native).

use std::process::ExitCode;

#[cfg(feature = "native")]
fn main() -> ExitCode {
    use startpage_app::{AppConfig, Command, USAGE, run_command};
    use startpage_core::AppStore;

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig::from_env();
    log::info!("Starting start page shell ({:?})", command);
    let mut store = AppStore::load(config.open_storage());

    let stdout = std::io::stdout();
    match run_command(&mut store, command, &config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() -> ExitCode {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
    ExitCode::FAILURE
}
