//! Terrain elevation samples owned by the world.

use crate::SetupError;

/// Immutable grid of elevation samples indexed by integer `(x, z)` cells.
///
/// Samples are stored row-major along Z in one contiguous buffer. World
/// coordinates are truncated to cell indices; anything outside
/// `[0, width) x [0, length)` reads as zero. Zero is a sentinel for "off the
/// grid", not meaningful ground level.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: u32,
    length: u32,
    samples: Vec<f32>,
}

impl HeightField {
    /// Wraps pre-computed samples, validating them against the dimensions.
    pub fn from_samples(width: u32, length: u32, samples: Vec<f32>) -> Result<Self, SetupError> {
        if width == 0 || length == 0 {
            return Err(SetupError::EmptyGrid { width, length });
        }

        let expected = cell_count(width, length);
        if samples.len() != expected {
            return Err(SetupError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            length,
            samples,
        })
    }

    /// Samples `elevation` at every integer cell of a `width x length` grid.
    pub fn from_fn<F>(width: u32, length: u32, elevation: F) -> Result<Self, SetupError>
    where
        F: Fn(f32, f32) -> f32,
    {
        let mut samples = Vec::with_capacity(cell_count(width, length));
        for z in 0..length {
            for x in 0..width {
                samples.push(elevation(x as f32, z as f32));
            }
        }
        Self::from_samples(width, length, samples)
    }

    /// Number of cells along world X.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along world Z.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Elevation of the cell containing the world-space point `(x, z)`.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.index(x, z)
            .and_then(|index| self.samples.get(index).copied())
            .unwrap_or(0.0)
    }

    fn index(&self, x: f32, z: f32) -> Option<usize> {
        // Negated comparisons also reject NaN.
        if !(x >= 0.0 && z >= 0.0) {
            return None;
        }
        if x >= self.width as f32 || z >= self.length as f32 {
            return None;
        }

        let column = usize::try_from(x as u32).ok()?;
        let row = usize::try_from(z as u32).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

fn cell_count(width: u32, length: u32) -> usize {
    let count = u64::from(width) * u64::from(length);
    usize::try_from(count).unwrap_or(usize::MAX)
}
