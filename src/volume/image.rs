//! In-memory 3D volume with its NIfTI header
//!
//! A `Volume` pairs a dense `(X, Y, Z)` array with the header it was read
//! from, so that derived volumes (crops) can be written back with the same
//! spatial placement.

use ndarray::Array3;
use nifti::NiftiHeader;

/// Dense 3D volume plus spatial metadata
#[derive(Debug, Clone)]
pub struct Volume {
    /// Voxel values indexed as `[x, y, z]`, already scaled by `scl_slope`/`scl_inter`
    data: Array3<f32>,
    /// Header carrying the affine, voxel sizes and units
    header: NiftiHeader,
}

impl Volume {
    /// Create a volume from data and the header describing its placement
    pub fn new(data: Array3<f32>, header: NiftiHeader) -> Self {
        Volume { data, header }
    }

    /// Create a volume with unit voxels and an identity affine
    pub fn from_array(data: Array3<f32>) -> Self {
        let mut header = NiftiHeader::default();
        header.pixdim = [1.0; 8];
        header.sform_code = 1;
        header.srow_x = [1.0, 0.0, 0.0, 0.0];
        header.srow_y = [0.0, 1.0, 0.0, 0.0];
        header.srow_z = [0.0, 0.0, 1.0, 0.0];
        header.scl_slope = 1.0;
        header.scl_inter = 0.0;
        Volume { data, header }
    }

    /// Build a new volume on the same grid metadata with different data
    pub fn with_data(&self, data: Array3<f32>) -> Self {
        Volume {
            data,
            header: self.header.clone(),
        }
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Volume extent along x, y and z
    pub fn shape(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.data.dim();
        [nx, ny, nz]
    }

    /// Voxel sizes in header units (usually mm)
    pub fn voxel_size(&self) -> (f64, f64, f64) {
        let pixdim = self.header.pixdim;
        (pixdim[1] as f64, pixdim[2] as f64, pixdim[3] as f64)
    }

    /// Whether any voxel differs from zero
    ///
    /// NaN counts as nonzero. A zero-sized volume has no nonzero voxel.
    pub fn has_nonzero(&self) -> bool {
        self.data.iter().any(|&v| v != 0.0)
    }

    /// Voxel-to-world affine transformation matrix (4x4, row-major)
    ///
    /// Uses the sform rows when `sform_code > 0`, then the qform quaternion
    /// when `qform_code > 0`, otherwise a diagonal built from the voxel sizes.
    pub fn affine(&self) -> [f64; 16] {
        let header = &self.header;
        if header.sform_code > 0 {
            let s = &header.srow_x;
            let t = &header.srow_y;
            let u = &header.srow_z;
            [
                s[0] as f64, s[1] as f64, s[2] as f64, s[3] as f64,
                t[0] as f64, t[1] as f64, t[2] as f64, t[3] as f64,
                u[0] as f64, u[1] as f64, u[2] as f64, u[3] as f64,
                0.0, 0.0, 0.0, 1.0,
            ]
        } else if header.qform_code > 0 {
            self.qform_affine()
        } else {
            let (vsx, vsy, vsz) = self.voxel_size();
            [
                vsx, 0.0, 0.0, 0.0,
                0.0, vsy, 0.0, 0.0,
                0.0, 0.0, vsz, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ]
        }
    }

    /// Affine from the quaternion, voxel sizes and offsets of the qform
    fn qform_affine(&self) -> [f64; 16] {
        let header = &self.header;
        let (b, c, d) = (header.quatern_b as f64, header.quatern_c as f64, header.quatern_d as f64);

        // The real part is implied; rounding can push b²+c²+d² slightly past 1
        let sum = b * b + c * c + d * d;
        let (a, b, c, d) = if sum > 1.0 {
            let norm = sum.sqrt();
            (0.0, b / norm, c / norm, d / norm)
        } else {
            ((1.0 - sum).sqrt(), b, c, d)
        };

        let (dx, dy, dz) = self.voxel_size();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dz = dz * qfac;

        let (ox, oy, oz) = (header.quatern_x as f64, header.quatern_y as f64, header.quatern_z as f64);
        [
            (a * a + b * b - c * c - d * d) * dx, 2.0 * (b * c - a * d) * dy, 2.0 * (b * d + a * c) * dz, ox,
            2.0 * (b * c + a * d) * dx, (a * a + c * c - b * b - d * d) * dy, 2.0 * (c * d - a * b) * dz, oy,
            2.0 * (b * d - a * c) * dx, 2.0 * (c * d + a * b) * dy, (a * a + d * d - b * b - c * c) * dz, oz,
            0.0, 0.0, 0.0, 1.0,
        ]
    }

    /// Header to hand to the writer
    ///
    /// Data are held already scaled, so the intensity scaling is reset to
    /// identity; every spatial field is kept as-is.
    pub(crate) fn reference_header(&self) -> NiftiHeader {
        let mut header = self.header.clone();
        header.scl_slope = 1.0;
        header.scl_inter = 0.0;
        header
    }
}
