use super::params::DerivedParams;

/// Reflect a coordinate past the far edge back into `[0, extent)`.
///
/// In-range coordinates are returned unchanged. One step past the edge maps
/// as `extent - (coord - extent + 1) - 1`, i.e. mirrored about the last
/// sample without repeating it. Coordinates further out keep reflecting off
/// both edges, so a block wider than the image is still fully populated.
pub fn mirror_coord(coord: usize, extent: usize) -> usize {
    if coord < extent {
        return coord;
    }
    if extent <= 1 {
        return 0;
    }
    let period = 2 * (extent - 1);
    let c = coord % period;
    if c < extent {
        c
    } else {
        period - c
    }
}

/// Signed variant of [`mirror_coord`] that also reflects about index 0.
pub fn mirror_index(coord: isize, extent: usize) -> usize {
    mirror_coord(coord.unsigned_abs(), extent)
}

/// Top-left corner of one analysis block in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockOrigin {
    pub x: usize,
    pub y: usize,
}

/// Block origins covering the image plus its mirrored bottom/right padding.
#[derive(Clone, Debug)]
pub struct BlockGrid {
    pub block_size: usize,
    pub stride: usize,
    pub padded_width: usize,
    pub padded_height: usize,
}

impl BlockGrid {
    pub fn new(derived: &DerivedParams) -> Self {
        Self {
            block_size: derived.block_size,
            stride: derived.stride,
            padded_width: derived.padded_width,
            padded_height: derived.padded_height,
        }
    }

    /// Block origins along x.
    pub fn columns(&self) -> impl Iterator<Item = usize> {
        (0..=self.padded_width - self.block_size).step_by(self.stride)
    }

    /// Block origins along y; each one starts a band of blocks.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        (0..=self.padded_height - self.block_size).step_by(self.stride)
    }

    /// All origins in row-major order.
    pub fn origins(&self) -> impl Iterator<Item = BlockOrigin> + '_ {
        self.rows()
            .flat_map(move |y| self.columns().map(move |x| BlockOrigin { x, y }))
    }

    pub fn block_count(&self) -> usize {
        self.rows().count() * self.columns().count()
    }
}
