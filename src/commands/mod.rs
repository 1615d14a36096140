//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod coords_command;
pub mod crop_command;

pub use cli::build_cli;
pub use command_traits::{Command, CommandFactory};
pub use coords_command::CoordsCommand;
pub use crop_command::CropCommand;

use clap::ArgMatches;
use crate::config::CropConfig;
use crate::volume::{VolumeError, VolumeResult};

/// Factory for creating command instances based on CLI arguments
///
/// Dispatches on the subcommand name.
pub struct RoilocCommandFactory;

impl RoilocCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        RoilocCommandFactory
    }
}

impl Default for RoilocCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for RoilocCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &CropConfig) -> VolumeResult<Box<dyn Command>> {
        match args.subcommand() {
            Some(("coords", sub_args)) => Ok(Box::new(CoordsCommand::new(sub_args, config)?)),
            Some(("crop", sub_args)) => Ok(Box::new(CropCommand::new(sub_args, config)?)),
            Some((name, _)) => Err(VolumeError::GenericError(format!("Unknown command: {}", name))),
            None => Err(VolumeError::GenericError("No command given".to_string())),
        }
    }
}
