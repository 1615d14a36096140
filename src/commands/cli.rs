//! Command-line argument definitions

use clap::{Arg, ArgAction, ArgGroup, Command as ClapCommand};

/// Build the clap parser for the `roiloc` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("roiloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Locate an ROI in a 3D mask and crop co-registered volumes around it")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file overriding the default settings")
                .value_name("FILE")
                .global(true)
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log records to this file")
                .value_name("FILE")
                .global(true)
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            ClapCommand::new("coords")
                .about("Print the padded bounding box of a mask's nonzero region")
                .arg(
                    Arg::new("mask")
                        .help("Mask volume (.nii or .nii.gz)")
                        .required(true)
                        .index(1),
                )
                .arg(margin_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Save the coordinates to this text file")
                        .value_name("FILE")
                        .required(false),
                ),
        )
        .subcommand(
            ClapCommand::new("crop")
                .about("Crop images to the ROI of a mask or to given coordinates")
                .arg(
                    Arg::new("images")
                        .help("Images to crop, on the same grid as the mask")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory receiving the cropped images")
                        .value_name("DIR")
                        .required(true),
                )
                .arg(
                    Arg::new("mask")
                        .long("mask")
                        .help("Mask whose nonzero region defines the crop")
                        .value_name("FILE"),
                )
                .arg(
                    Arg::new("coords")
                        .long("coords")
                        .help("Coordinates as 'minx,miny,minz,maxx,maxy,maxz' or a coordinate file")
                        .value_name("COORDS"),
                )
                .group(
                    ArgGroup::new("source")
                        .args(["mask", "coords"])
                        .required(true),
                )
                .arg(margin_arg())
                .arg(
                    Arg::new("inclusive")
                        .long("inclusive")
                        .help("Treat the max coordinates as inclusive")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-log-coords")
                        .long("no-log-coords")
                        .help("Do not write a coordinate file next to each crop")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn margin_arg() -> Arg {
    Arg::new("margin")
        .short('m')
        .long("margin")
        .help("Margin around the ROI in voxels (x,y,z)")
        .value_name("X,Y,Z")
        .required(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandFactory, RoilocCommandFactory};
    use crate::config::CropConfig;

    #[test]
    fn test_cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_crop_requires_a_coordinate_source() {
        let result = build_cli().try_get_matches_from(["roiloc", "crop", "t1.nii", "-o", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_factory_builds_crop_command() {
        let matches = build_cli()
            .try_get_matches_from(["roiloc", "crop", "a.nii", "b.nii", "-o", "out", "--coords", "0,0,0,4,4,4", "--inclusive"])
            .unwrap();
        let command = RoilocCommandFactory::new().create_command(&matches, &CropConfig::default());
        assert!(command.is_ok());
    }

    #[test]
    fn test_factory_rejects_bad_margin() {
        let matches = build_cli()
            .try_get_matches_from(["roiloc", "coords", "mask.nii", "--margin", "1,2"])
            .unwrap();
        let command = RoilocCommandFactory::new().create_command(&matches, &CropConfig::default());
        assert!(command.is_err());
    }
}
