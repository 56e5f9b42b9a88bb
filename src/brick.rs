use crate::spatial::math::{flat_projection, octant_offset, vector::V3c};
use bytemuck::Pod;
use num_traits::Float;
use std::io::{Read, Write};

/// Error raised when an operation pairs bricks of different shapes
#[derive(Debug, thiserror::Error)]
pub enum BrickError {
    #[error("brick dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: V3c<u32>,
        actual: V3c<u32>,
    },
}

/// Dense 3 dimensional block of scalar values, stored in x-fastest order.
/// All bricks taking part in one dataset share the same dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Brick<T> {
    dims: V3c<u32>,
    data: Vec<T>,
}

impl<T: Float> Brick<T> {
    pub fn new(dims: V3c<u32>, fill: T) -> Self {
        Self {
            data: vec![fill; dims.volume() as usize],
            dims,
        }
    }

    pub fn dims(&self) -> V3c<u32> {
        self.dims
    }

    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    pub fn byte_count(&self) -> usize {
        self.data.len() * std::mem::size_of::<T>()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    fn index(&self, x: u32, y: u32, z: u32) -> usize {
        assert!(
            x < self.dims.x && y < self.dims.y && z < self.dims.z,
            "voxel ({}, {}, {}) outside of brick dimensions {:?}",
            x,
            y,
            z,
            self.dims
        );
        flat_projection(
            x as usize,
            y as usize,
            z as usize,
            self.dims.x as usize,
            self.dims.y as usize,
        )
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> T {
        self.data[self.index(x, y, z)]
    }

    pub fn set(&mut self, x: u32, y: u32, z: u32, value: T) {
        let index = self.index(x, y, z);
        self.data[index] = value;
    }

    /// Downsamples the brick by averaging each 2x2x2 voxel block into one voxel,
    /// placed into the lower octant of a same-sized result. Samples beyond the
    /// brick extent are skipped and the average taken over the remaining ones,
    /// so a unit-sized axis degrades to a copy. The untouched voxels keep the
    /// fill value; `combine` overwrites them in the parent assembly.
    pub fn filter(&self) -> Brick<T> {
        let lower = V3c::new(
            (self.dims.x + 1) / 2,
            (self.dims.y + 1) / 2,
            (self.dims.z + 1) / 2,
        );
        let mut result = Brick::new(self.dims, T::zero());
        for z in 0..lower.z {
            for y in 0..lower.y {
                for x in 0..lower.x {
                    let mut sum = T::zero();
                    let mut samples = T::zero();
                    for dz in 0..2 {
                        for dy in 0..2 {
                            for dx in 0..2 {
                                let (sx, sy, sz) = (2 * x + dx, 2 * y + dy, 2 * z + dz);
                                if sx < self.dims.x && sy < self.dims.y && sz < self.dims.z {
                                    sum = sum + self.get(sx, sy, sz);
                                    samples = samples + T::one();
                                }
                            }
                        }
                    }
                    result.set(x, y, z, sum / samples);
                }
            }
        }
        result
    }

    /// Assembles eight filtered children into their parent brick: the lower-octant
    /// block of child `i` lands in octant `i` of the result, so the parent covers
    /// twice the linear extent of one child at the same brick dimensions. Children
    /// are indexed in Z-order. Where octant blocks overlap (axes too small to
    /// halve cleanly) the overlapping contributions are averaged.
    pub fn combine(children: &[Brick<T>; 8]) -> Result<Brick<T>, BrickError> {
        let dims = children[0].dims;
        for child in children.iter() {
            if child.dims != dims {
                return Err(BrickError::DimensionMismatch {
                    expected: dims,
                    actual: child.dims,
                });
            }
        }
        let half = dims / 2;
        let lower = V3c::new((dims.x + 1) / 2, (dims.y + 1) / 2, (dims.z + 1) / 2);
        let voxel_count = dims.volume() as usize;
        let mut sums = vec![T::zero(); voxel_count];
        let mut counts = vec![0u32; voxel_count];
        for (octant, child) in children.iter().enumerate() {
            let base = octant_offset(octant) * half;
            for z in 0..lower.z {
                for y in 0..lower.y {
                    for x in 0..lower.x {
                        let index = flat_projection(
                            (base.x + x) as usize,
                            (base.y + y) as usize,
                            (base.z + z) as usize,
                            dims.x as usize,
                            dims.y as usize,
                        );
                        sums[index] = sums[index] + child.get(x, y, z);
                        counts[index] += 1;
                    }
                }
            }
        }
        // the octant blocks tile the whole brick, every voxel has at least one sample
        let data = sums
            .into_iter()
            .zip(counts)
            .map(|(sum, count)| {
                let mut divisor = T::zero();
                for _ in 0..count {
                    divisor = divisor + T::one();
                }
                sum / divisor
            })
            .collect();
        Ok(Brick { dims, data })
    }

    /// Voxelwise mean of two same-shaped bricks
    pub fn average(a: &Brick<T>, b: &Brick<T>) -> Result<Brick<T>, BrickError> {
        if a.dims != b.dims {
            return Err(BrickError::DimensionMismatch {
                expected: a.dims,
                actual: b.dims,
            });
        }
        let two = T::one() + T::one();
        let data = a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(left, right)| (*left + *right) / two)
            .collect();
        Ok(Brick { dims: a.dims, data })
    }
}

impl<T: Float + Pod> Brick<T> {
    /// Reads one brick of the given dimensions as raw voxel payload
    pub fn read_from<R: Read>(dims: V3c<u32>, reader: &mut R) -> std::io::Result<Self> {
        let mut brick = Brick::new(dims, T::zero());
        reader.read_exact(bytemuck::cast_slice_mut(&mut brick.data))?;
        Ok(brick)
    }

    /// Writes the raw voxel payload, without any per-brick framing
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(bytemuck::cast_slice(&self.data))
    }
}
