use std::process;
use log::{error, LevelFilter};

use roiloc::commands::{build_cli, CommandFactory, RoilocCommandFactory};
use roiloc::config::CropConfig;
use roiloc::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up file logger: {}", e);
                process::exit(1);
            }
        },
        None => Logger::init_console_logger(level),
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match CropConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => CropConfig::default(),
    };

    let factory = RoilocCommandFactory::new();

    match factory.create_command(&matches, &config) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
