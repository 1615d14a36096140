//! ROI bounding box extraction
//!
//! Finds the axis-aligned box enclosing every nonzero voxel of a mask,
//! pads it by a per-axis margin and clamps it to the mask's extent.

use std::fmt;

use ndarray::{ArrayBase, Data, Ix3};

use crate::volume::{VolumeError, VolumeResult};

/// Padding added around a bounding box, in voxels along x, y and z
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin(pub [usize; 3]);

impl Default for Margin {
    fn default() -> Self {
        Margin([4, 4, 2])
    }
}

impl Margin {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Margin([x, y, z])
    }

    /// Parse a margin from a string (format: "x,y,z")
    pub fn from_string(margin_str: &str) -> VolumeResult<Self> {
        let parts: Vec<&str> = margin_str.split(',').collect();
        if parts.len() != 3 {
            return Err(VolumeError::GenericError(
                "Margin must have 3 comma-separated values".to_string(),
            ));
        }

        let mut margin = [0usize; 3];
        for (axis, part) in parts.iter().enumerate() {
            margin[axis] = part.trim().parse::<usize>().map_err(|_| {
                VolumeError::GenericError(format!("Invalid margin value: '{}'", part.trim()))
            })?;
        }

        Ok(Margin(margin))
    }
}

/// Index range of a crop in `[minx, miny, minz, maxx, maxy, maxz]` order
///
/// Lower bounds are inclusive. How the upper bounds are read depends on the
/// `UpperBound` convention used when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coords {
    /// Lower corner (x, y, z)
    pub min: [usize; 3],
    /// Upper corner (x, y, z)
    pub max: [usize; 3],
}

impl Coords {
    pub fn new(min: [usize; 3], max: [usize; 3]) -> Self {
        Coords { min, max }
    }

    /// Build coordinates from six signed values in xyzxyz order
    pub fn from_values(values: &[i64]) -> VolumeResult<Self> {
        if values.len() != 6 {
            return Err(VolumeError::InvalidCoords(format!(
                "expected 6 values, got {}",
                values.len()
            )));
        }

        let mut out = [0usize; 6];
        for (slot, &value) in out.iter_mut().zip(values) {
            *slot = usize::try_from(value).map_err(|_| {
                VolumeError::InvalidCoords(format!("negative value {}", value))
            })?;
        }

        Ok(Coords::from(out))
    }

    /// Parse coordinates from a string (format: "minx,miny,minz,maxx,maxy,maxz")
    pub fn from_string(coords_str: &str) -> VolumeResult<Self> {
        let values = coords_str
            .split(',')
            .map(|part| {
                part.trim().parse::<i64>().map_err(|_| {
                    VolumeError::InvalidCoords(format!("invalid value '{}'", part.trim()))
                })
            })
            .collect::<VolumeResult<Vec<i64>>>()?;

        Coords::from_values(&values)
    }

    pub fn to_array(&self) -> [usize; 6] {
        [self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]]
    }
}

impl From<[usize; 6]> for Coords {
    fn from(values: [usize; 6]) -> Self {
        Coords {
            min: [values[0], values[1], values[2]],
            max: [values[3], values[4], values[5]],
        }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.to_array();
        write!(f, "[{}, {}, {}, {}, {}, {}]", v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

/// Get the coordinates of the nonzero region of a mask, padded by a margin
///
/// Voxels equal to `T::default()` (zero, or `false` for boolean masks) are
/// background. Each lower bound is `min - margin`, clamped at 0. Each upper
/// bound is `max + margin`, clamped at the axis length; note that the clamp
/// value is one past the last valid index.
///
/// # Errors
/// `VolumeError::EmptyMask` when no voxel is nonzero.
pub fn get_coords<S, T>(x: &ArrayBase<S, Ix3>, margin: Margin) -> VolumeResult<Coords>
where
    S: Data<Elem = T>,
    T: PartialEq + Default,
{
    let (ux, uy, uz) = x.dim();
    let shape = [ux, uy, uz];
    let background = T::default();

    let mut lower = [usize::MAX; 3];
    let mut upper = [0usize; 3];
    let mut found = false;

    for ((i, j, k), value) in x.indexed_iter() {
        if *value == background {
            continue;
        }
        found = true;
        for (axis, index) in [i, j, k].into_iter().enumerate() {
            lower[axis] = lower[axis].min(index);
            upper[axis] = upper[axis].max(index);
        }
    }

    if !found {
        return Err(VolumeError::EmptyMask);
    }

    let min = std::array::from_fn(|axis| lower[axis].saturating_sub(margin.0[axis]));
    let max = std::array::from_fn(|axis| {
        let padded = upper[axis].saturating_add(margin.0[axis]);
        if padded < shape[axis] { padded } else { shape[axis] }
    });

    Ok(Coords { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use test_case::test_case;

    fn single_voxel_mask() -> Array3<u8> {
        let mut mask = Array3::<u8>::zeros((10, 10, 10));
        mask[[5, 5, 5]] = 1;
        mask
    }

    #[test_case([0, 0, 0], [5, 5, 5, 5, 5, 5]; "no margin")]
    #[test_case([4, 4, 2], [1, 1, 3, 9, 9, 7]; "default margin")]
    #[test_case([5, 5, 5], [0, 0, 0, 10, 10, 10]; "margin reaching both borders")]
    #[test_case([9, 1, 30], [0, 4, 0, 10, 6, 10]; "mixed clamping")]
    fn test_single_voxel(margin: [usize; 3], expected: [usize; 6]) {
        let coords = get_coords(&single_voxel_mask(), Margin(margin)).unwrap();
        assert_eq!(coords.to_array(), expected);
    }

    #[test]
    fn test_full_mask_clamps_both_sides() {
        let mask = Array3::<u8>::ones((10, 12, 8));
        let coords = get_coords(&mask, Margin::default()).unwrap();
        assert_eq!(coords.to_array(), [0, 0, 0, 10, 12, 8]);
    }

    #[test]
    fn test_box_spans_all_nonzero_voxels() {
        let mut mask = Array3::<f32>::zeros((20, 20, 20));
        mask[[3, 10, 7]] = 1.0;
        mask[[12, 4, 9]] = 2.0;
        mask[[8, 15, 2]] = -1.0;

        let coords = get_coords(&mask, Margin::new(0, 0, 0)).unwrap();
        assert_eq!(coords.min, [3, 4, 2]);
        assert_eq!(coords.max, [12, 15, 9]);
    }

    #[test]
    fn test_boolean_mask() {
        let mut mask = Array3::from_elem((6, 6, 6), false);
        mask[[1, 2, 3]] = true;
        let coords = get_coords(&mask, Margin::new(1, 1, 1)).unwrap();
        assert_eq!(coords.to_array(), [0, 1, 2, 2, 3, 4]);
    }

    #[test]
    fn test_works_on_views() {
        let mut mask = Array3::<u8>::zeros((8, 8, 8));
        mask[[6, 6, 6]] = 1;
        let view = mask.slice(ndarray::s![4.., 4.., 4..]);
        let coords = get_coords(&view, Margin::new(0, 0, 0)).unwrap();
        assert_eq!(coords.to_array(), [2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_empty_mask_is_an_error() {
        let mask = Array3::<u8>::zeros((4, 4, 4));
        assert!(matches!(get_coords(&mask, Margin::default()), Err(VolumeError::EmptyMask)));
    }

    #[test]
    fn test_bounds_invariant() {
        let mut mask = Array3::<u8>::zeros((9, 7, 5));
        mask[[0, 6, 2]] = 1;
        mask[[8, 3, 4]] = 1;

        for m in 0..12 {
            let coords = get_coords(&mask, Margin::new(m, m / 2, m / 3)).unwrap();
            let shape = [9, 7, 5];
            for axis in 0..3 {
                assert!(coords.min[axis] <= coords.max[axis]);
                assert!(coords.max[axis] <= shape[axis]);
            }
        }
    }

    #[test]
    fn test_margin_is_monotonic() {
        let mut mask = Array3::<u8>::zeros((30, 30, 30));
        mask[[14, 10, 20]] = 1;
        mask[[16, 12, 21]] = 1;

        let mut previous = [0usize; 3];
        for m in 0..20 {
            let coords = get_coords(&mask, Margin::new(m, m, m)).unwrap();
            let extent: [usize; 3] = std::array::from_fn(|a| coords.max[a] - coords.min[a]);
            for axis in 0..3 {
                assert!(extent[axis] >= previous[axis], "margin {} shrank axis {}", m, axis);
            }
            previous = extent;
        }
    }

    #[test]
    fn test_margin_from_string() {
        assert_eq!(Margin::from_string("4, 4,2").unwrap(), Margin::new(4, 4, 2));
        assert!(Margin::from_string("4,4").is_err());
        assert!(Margin::from_string("4,-1,2").is_err());
    }

    #[test]
    fn test_coords_from_string_and_display() {
        let coords = Coords::from_string("1,2,3,7,8,9").unwrap();
        assert_eq!(coords.min, [1, 2, 3]);
        assert_eq!(coords.max, [7, 8, 9]);
        assert_eq!(coords.to_string(), "[1, 2, 3, 7, 8, 9]");

        assert!(matches!(Coords::from_string("1,2,3"), Err(VolumeError::InvalidCoords(_))));
        assert!(matches!(Coords::from_string("1,2,3,4,5,x"), Err(VolumeError::InvalidCoords(_))));
        assert!(matches!(Coords::from_string("-1,2,3,4,5,6"), Err(VolumeError::InvalidCoords(_))));
    }
}
