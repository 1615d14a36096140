//! NIfTI volume loading
//!
//! Volumes can be read from a path (`.nii` or `.nii.gz`) or from an
//! in-memory byte buffer, in which case gzip compression is detected from
//! the stream's magic bytes rather than a file extension.

use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use flate2::read::GzDecoder;
use log::{debug, info};
use ndarray::{Array3, ArrayD, Axis, Ix3};
use nifti::{InMemNiftiObject, IntoNdArray, NiftiObject, ReaderOptions};

use super::errors::{VolumeError, VolumeResult};
use super::image::Volume;

/// Size of a NIfTI-1 header in bytes
const NIFTI1_HEADER_SIZE: usize = 348;

impl Volume {
    /// Load a volume from a `.nii` or `.nii.gz` file
    pub fn load<P: AsRef<Path>>(path: P) -> VolumeResult<Self> {
        let path = path.as_ref();
        info!("Loading volume from {}", path.display());

        let object = ReaderOptions::new().read_file(path)?;
        let volume = from_object(object)?;

        debug!("Loaded {} with shape {:?}", path.display(), volume.shape());
        Ok(volume)
    }

    /// Load a volume from the bytes of a NIfTI-1 file
    ///
    /// Supports both plain and gzip compressed data.
    pub fn from_bytes(bytes: &[u8]) -> VolumeResult<Self> {
        let object = if is_gzip(bytes) {
            debug!("Reading gzip compressed NIfTI from {} bytes", bytes.len());
            InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes))).map_err(|e| {
                let mut decompressed = Vec::new();
                let info = match GzDecoder::new(Cursor::new(bytes)).read_to_end(&mut decompressed) {
                    Ok(_) => header_info(&decompressed),
                    Err(_) => "could not decompress".to_string(),
                };
                VolumeError::GenericError(format!("Failed to read gzipped NIfTI: {} ({})", e, info))
            })?
        } else {
            debug!("Reading NIfTI from {} bytes", bytes.len());
            InMemNiftiObject::from_reader(Cursor::new(bytes)).map_err(|e| {
                VolumeError::GenericError(format!("Failed to read NIfTI: {} ({})", e, header_info(bytes)))
            })?
        };

        from_object(object)
    }
}

fn from_object(object: InMemNiftiObject) -> VolumeResult<Volume> {
    let header = object.header().clone();
    let array: ArrayD<f32> = object.into_volume().into_ndarray::<f32>()?;
    Ok(Volume::new(into_array3(array)?, header))
}

/// Reduce an array to three dimensions
///
/// Trailing axes of length 1 (e.g. a single time point) are dropped; any
/// other shape is rejected.
fn into_array3(array: ArrayD<f32>) -> VolumeResult<Array3<f32>> {
    let ndim = array.ndim();
    if ndim < 3 || array.shape()[3..].iter().any(|&d| d != 1) {
        return Err(VolumeError::NotThreeDimensional(ndim));
    }

    let mut array = array;
    while array.ndim() > 3 {
        let last = array.ndim() - 1;
        array = array.index_axis_move(Axis(last), 0);
    }

    Ok(array.into_dimensionality::<Ix3>()?)
}

/// Check if bytes are gzip compressed
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Summarise the raw header fields for error messages
fn header_info(bytes: &[u8]) -> String {
    if bytes.len() < NIFTI1_HEADER_SIZE {
        return format!("file too small ({} bytes, need at least {})", bytes.len(), NIFTI1_HEADER_SIZE);
    }

    let little = LittleEndian::read_i32(&bytes[0..4]);
    let big = BigEndian::read_i32(&bytes[0..4]);
    let (sizeof_hdr, datatype, order) = if little != NIFTI1_HEADER_SIZE as i32 && big == NIFTI1_HEADER_SIZE as i32 {
        (big, BigEndian::read_i16(&bytes[70..72]), "big-endian")
    } else {
        (little, LittleEndian::read_i16(&bytes[70..72]), "little-endian")
    };

    let magic = String::from_utf8_lossy(&bytes[344..348])
        .trim_end_matches('\0')
        .to_string();

    format!("sizeof_hdr={}, magic='{}', datatype={}, {}", sizeof_hdr, magic, datatype, order)
}
