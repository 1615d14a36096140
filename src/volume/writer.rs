//! NIfTI volume saving

use std::path::Path;

use log::info;
use nifti::writer::WriterOptions;

use super::errors::{VolumeError, VolumeResult};
use super::image::Volume;

/// File name endings the NIfTI writer keeps as given
const NIFTI_EXTENSIONS: [&str; 4] = [".nii", ".nii.gz", ".hdr", ".hdr.gz"];

/// Check that the writer will not rename the output
fn check_output_path(path: &Path) -> VolumeResult<()> {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if NIFTI_EXTENSIONS.iter().any(|ext| name.len() > ext.len() && name.ends_with(ext)) {
        Ok(())
    } else {
        Err(VolumeError::GenericError(format!(
            "Output path must end in .nii, .nii.gz, .hdr or .hdr.gz: {}",
            path.display()
        )))
    }
}

impl Volume {
    /// Save the volume to a NIfTI file
    ///
    /// The volume's own header is used as reference, so the affine, voxel
    /// sizes and units are carried over; only the dimensions and data type
    /// follow the array. Paths ending in `.gz` are gzip compressed. Any other
    /// ending than `.nii`, `.nii.gz`, `.hdr` or `.hdr.gz` is rejected.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> VolumeResult<()> {
        let path = path.as_ref();
        check_output_path(path)?;
        info!("Writing volume with shape {:?} to {}", self.shape(), path.display());

        let header = self.reference_header();
        WriterOptions::new(path)
            .reference_header(&header)
            .write_nifti(self.data())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array3;

    use super::*;

    fn sample_volume() -> Volume {
        let data = Array3::from_shape_fn((4, 3, 2), |(i, j, k)| (i + 10 * j + 100 * k) as f32 * 0.5);
        let mut header = Volume::from_array(Array3::zeros((1, 1, 1))).header().clone();
        header.pixdim[1] = 1.0;
        header.pixdim[2] = 2.0;
        header.pixdim[3] = 3.0;
        header.srow_x = [1.0, 0.0, 0.0, 10.0];
        header.srow_y = [0.0, 2.0, 0.0, 20.0];
        header.srow_z = [0.0, 0.0, 3.0, 30.0];
        Volume::new(data, header)
    }

    fn assert_same_volume(loaded: &Volume, expected: &Volume) {
        assert_eq!(loaded.shape(), expected.shape());
        for (a, b) in loaded.affine().iter().zip(expected.affine().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
        for (a, b) in loaded.data().iter().zip(expected.data().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.nii");
        let volume = sample_volume();

        volume.save(&path).unwrap();
        let loaded = Volume::load(&path).unwrap();

        assert_same_volume(&loaded, &volume);
        assert_eq!(loaded.voxel_size(), (1.0, 2.0, 3.0));
    }

    #[test]
    fn test_save_and_load_gz_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.nii.gz");
        let volume = sample_volume();

        volume.save(&path).unwrap();
        let loaded = Volume::load(&path).unwrap();

        assert_same_volume(&loaded, &volume);
    }

    #[test]
    fn test_load_from_bytes_plain_and_gz() {
        let dir = tempfile::tempdir().unwrap();
        let volume = sample_volume();

        for name in ["bytes.nii", "bytes.nii.gz"] {
            let path = dir.path().join(name);
            volume.save(&path).unwrap();
            let bytes = std::fs::read(&path).unwrap();
            let loaded = Volume::from_bytes(&bytes).unwrap();
            assert_same_volume(&loaded, &volume);
        }
    }

    #[test]
    fn test_save_rejects_non_nifti_names() {
        let dir = tempfile::tempdir().unwrap();
        let volume = sample_volume();

        for name in ["sub-01.T1w", "volume.img", "volume", ".nii", "volume.nii.bak"] {
            let path = dir.path().join(name);
            assert!(
                matches!(volume.save(&path), Err(VolumeError::GenericError(_))),
                "{} should be rejected",
                name
            );
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_check_output_path_accepts_nifti_names() {
        for name in ["a.nii", "a.nii.gz", "a.hdr", "a.hdr.gz", "sub-01.T1w.nii.gz"] {
            assert!(check_output_path(Path::new(name)).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("volume.nii");
        assert!(sample_volume().save(&path).is_err());
    }
}
