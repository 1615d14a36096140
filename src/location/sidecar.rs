//! Coordinate sidecar files
//!
//! The coordinates used for a crop are stored next to the cropped image as
//! plain text, six whitespace-separated values in xyzxyz order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::coords::Coords;
use crate::volume::{VolumeError, VolumeResult};

/// Path of the sidecar belonging to a cropped image (`<stem>.txt`)
///
/// Only the last extension is replaced, so `crop.nii.gz` maps to
/// `crop.nii.txt`.
pub fn coords_path(output_path: &Path) -> PathBuf {
    output_path.with_extension("txt")
}

/// Write coordinates, one value per line
pub fn write_coords(path: &Path, coords: &Coords) -> VolumeResult<()> {
    debug!("Writing coordinates {} to {}", coords, path.display());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for value in coords.to_array() {
        writeln!(writer, "{}", value)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read coordinates back from a sidecar file
pub fn read_coords(path: &Path) -> VolumeResult<Coords> {
    let content = std::fs::read_to_string(path)?;
    parse_coords(&content)
}

/// Parse whitespace-separated coordinates
///
/// Values may be integers or integral floats such as `4.000000000000000000e+00`.
pub fn parse_coords(content: &str) -> VolumeResult<Coords> {
    let values = content
        .split_whitespace()
        .map(parse_value)
        .collect::<VolumeResult<Vec<i64>>>()?;

    Coords::from_values(&values)
}

fn parse_value(token: &str) -> VolumeResult<i64> {
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value);
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(VolumeError::InvalidCoords(format!("'{}' is not an integer", token))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_path() {
        assert_eq!(coords_path(Path::new("out/crop.nii")), PathBuf::from("out/crop.txt"));
        assert_eq!(coords_path(Path::new("out/crop.nii.gz")), PathBuf::from("out/crop.nii.txt"));
    }

    #[test]
    fn test_write_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crop.txt");
        let coords = Coords::from([3, 0, 12, 250, 199, 64]);

        write_coords(&path, &coords).unwrap();
        assert_eq!(read_coords(&path).unwrap(), coords);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "3\n0\n12\n250\n199\n64\n");
    }

    #[test]
    fn test_parse_scientific_notation() {
        let content = "1.000000000000000000e+00\n2.000000000000000000e+00\n0.000000000000000000e+00\n\
                       1.100000000000000000e+01\n2.000000000000000000e+01\n8.000000000000000000e+00\n";
        assert_eq!(parse_coords(content).unwrap().to_array(), [1, 2, 0, 11, 20, 8]);
    }

    #[test]
    fn test_parse_single_line() {
        assert_eq!(parse_coords("1 2 3\t4 5 6").unwrap().to_array(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_coords("1 2 3 4 5"), Err(VolumeError::InvalidCoords(_))));
        assert!(matches!(parse_coords("1 2 3 4 5 6.5"), Err(VolumeError::InvalidCoords(_))));
        assert!(matches!(parse_coords("1 2 3 4 5 six"), Err(VolumeError::InvalidCoords(_))));
        assert!(matches!(parse_coords("1 2 -3 4 5 6"), Err(VolumeError::InvalidCoords(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_coords(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(VolumeError::IoError(_))));
    }
}
