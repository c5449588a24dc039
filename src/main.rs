use ChemCalc::cli::cli_main::run_interactive_menu;
use ChemCalc::error::StartupError;
use ChemCalc::session::Session;
use ChemCalc::settings::{AppConfig, ConfigManager};
use log::{LevelFilter, error, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;
use std::process::ExitCode;

fn init_logging(config: &AppConfig) -> Result<(), StartupError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.level_filter()?,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        let file = File::create(path).map_err(|source| StartupError::LogFile {
            path: path.clone(),
            source,
        })?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn run() -> Result<(), StartupError> {
    let mut settings = ConfigManager::new()?;
    init_logging(settings.get_config())?;
    info!("ChemCalc started, config file '{}'", settings.config_file());
    // element data must be available before the first interaction
    let mut session = Session::from_config(settings.get_config())?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_interactive_menu(&mut session, &mut settings, stdin.lock(), stdout.lock())?;
    Ok(())
}

pub fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("\x1b[31mChemCalc stopped: {}\x1b[0m", e);
            ExitCode::FAILURE
        }
    }
}
