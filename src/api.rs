use std::collections::HashMap;
use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::config::CropConfig;
use crate::location::{self, Coords, CropOutcome};
use crate::volume::{Volume, VolumeError, VolumeResult};

/// Main interface to the roiloc library
///
/// Holds the configuration shared by locating an ROI and cropping the
/// images that live on the same grid as its mask.
#[derive(Debug, Clone, Default)]
pub struct RoiLoc {
    config: CropConfig,
}

impl RoiLoc {
    /// Create a new RoiLoc instance
    ///
    /// # Arguments
    /// * `config` - Margin, upper bound convention and sidecar settings
    pub fn new(config: CropConfig) -> Self {
        RoiLoc { config }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Compute the padded ROI coordinates of a mask volume on disk
    ///
    /// # Arguments
    /// * `mask_path` - Path to a binary mask (`.nii` or `.nii.gz`)
    ///
    /// # Returns
    /// The coordinates in xyzxyz order, or an error if the mask cannot be
    /// read or is empty
    pub fn locate(&self, mask_path: &Path) -> VolumeResult<Coords> {
        let mask = Volume::load(mask_path)?;
        self.locate_volume(&mask)
    }

    /// Compute the padded ROI coordinates of an in-memory mask
    pub fn locate_volume(&self, mask: &Volume) -> VolumeResult<Coords> {
        let coords = location::get_coords(mask.data(), self.config.margin)?;
        info!("ROI coordinates with margin {:?}: {}", self.config.margin.0, coords);
        Ok(coords)
    }

    /// Crop one image on disk with the configured convention
    ///
    /// # Arguments
    /// * `image_path` - Path of the image to crop
    /// * `coords` - Coordinates, typically from `locate`
    /// * `output_path` - Where the cropped image is written
    ///
    /// # Returns
    /// Whether the crop was written or skipped because it was empty
    pub fn crop_image(&self, image_path: &Path, coords: &Coords, output_path: &Path) -> VolumeResult<CropOutcome> {
        let volume = Volume::load(image_path)?;
        location::crop_with(&volume, coords, self.config.upper_bound, output_path, self.config.log_coords)
    }

    /// Crop several images with the same coordinates
    ///
    /// Each image is written to `output_dir` under its own file name. Inputs
    /// sharing a file name are rejected before anything is written. The
    /// first failure aborts the batch.
    ///
    /// # Arguments
    /// * `coords` - Coordinates shared by every image
    /// * `images` - Images on the grid the coordinates were computed on
    /// * `output_dir` - Existing directory receiving the crops
    /// * `on_done` - Called after each image with its path and outcome
    pub fn crop_all<F>(&self,
                       coords: &Coords,
                       images: &[PathBuf],
                       output_dir: &Path,
                       mut on_done: F) -> VolumeResult<Vec<CropOutcome>>
    where
        F: FnMut(&Path, &CropOutcome),
    {
        let destinations = output_paths_for(images, output_dir)?;
        let mut outcomes = Vec::with_capacity(images.len());

        for (image_path, output_path) in images.iter().zip(&destinations) {
            info!("Cropping {} into {}", image_path.display(), output_path.display());

            let outcome = self.crop_image(image_path, coords, output_path)?;
            if !outcome.is_written() {
                warn!("No output for {}", image_path.display());
            }

            on_done(image_path, &outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

/// Destination of a cropped image inside the output directory
fn output_path_for(image_path: &Path, output_dir: &Path) -> VolumeResult<PathBuf> {
    let file_name = image_path.file_name().ok_or_else(|| {
        VolumeError::GenericError(format!("Input path has no file name: {}", image_path.display()))
    })?;
    Ok(output_dir.join(file_name))
}

/// Destinations for a batch, failing if two inputs map to the same file
fn output_paths_for(images: &[PathBuf], output_dir: &Path) -> VolumeResult<Vec<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut destinations = Vec::with_capacity(images.len());

    for image_path in images {
        let output_path = output_path_for(image_path, output_dir)?;
        if let Some(first) = claimed.insert(output_path.clone(), image_path) {
            return Err(VolumeError::GenericError(format!(
                "{} and {} would both be written to {}",
                first.display(),
                image_path.display(),
                output_path.display()
            )));
        }
        destinations.push(output_path);
    }

    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let path = output_path_for(Path::new("/data/sub-01/t1.nii.gz"), Path::new("/out")).unwrap();
        assert_eq!(path, PathBuf::from("/out/t1.nii.gz"));
        assert!(output_path_for(Path::new("/"), Path::new("/out")).is_err());
    }

    #[test]
    fn test_output_paths_reject_same_file_name() {
        let images = vec![PathBuf::from("/data/sub-01/t1.nii"), PathBuf::from("/data/sub-02/t1.nii")];
        match output_paths_for(&images, Path::new("/out")) {
            Err(VolumeError::GenericError(msg)) => {
                assert!(msg.contains("/data/sub-01/t1.nii"), "{}", msg);
                assert!(msg.contains("/data/sub-02/t1.nii"), "{}", msg);
            }
            other => panic!("expected a clash error, got {:?}", other),
        }
    }

    #[test]
    fn test_crop_all_same_file_name_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let mut images = Vec::new();
        for (subject, value) in [("sub-01", 1.0f32), ("sub-02", 2.0f32)] {
            let dir = input.path().join(subject);
            std::fs::create_dir(&dir).unwrap();
            let path = dir.join("t1.nii");
            Volume::from_array(ndarray::Array3::from_elem((4, 4, 4), value)).save(&path).unwrap();
            images.push(path);
        }

        let coords = Coords::from([0, 0, 0, 4, 4, 4]);
        let result = RoiLoc::default().crop_all(&coords, &images, output.path(), |_, _| {});
        assert!(matches!(result, Err(VolumeError::GenericError(_))));
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
