use crate::brick::BrickError;
use crate::spatial::math::vector::V3c;
use crate::spatial::{full_binary_tree_size, full_octree_size};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Byte count of the input file prefix: five u32 metadata fields
/// precede the voxel payload.
pub const INPUT_HEADER_BYTES: u64 = 5 * std::mem::size_of::<u32>() as u64;

/// Everything the caller provides to drive one pipeline run
#[derive(Debug, Clone)]
pub struct TspConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Brick edge length in voxels, applied to all three axes
    pub brick_dim: u32,
    /// Recorded in the output header, not applied to the payload layout
    pub padding_width: u32,
    /// Structure tag recorded in the output header
    pub structure: u32,
}

/// Failure cases of the pipeline; every one of them aborts the run
#[derive(Debug, thiserror::Error)]
pub enum TspError {
    #[error("could not read input file: {0}")]
    InputRead(#[source] std::io::Error),
    #[error("scratch file I/O failed: {0}")]
    ScratchIo(#[source] std::io::Error),
    #[error("could not write output file: {0}")]
    OutputWrite(#[source] std::io::Error),
    #[error("voxel dimensions {volume:?} are not divisible by brick dimensions {brick:?}")]
    GeometryMismatch { volume: V3c<u32>, brick: V3c<u32> },
    #[error("brick counts {0:?} must be equal on all axes and a power of two")]
    BrickCountNotCubic(V3c<u32>),
    #[error("timestep count {0} is not a power of two")]
    TimestepCount(u32),
    #[error(transparent)]
    Brick(#[from] BrickError),
    #[error("Z-order index outside of the octree base level")]
    ZOrderOutOfRange,
}

/// In-memory descriptor of the dataset geometry and brick layout,
/// immutable once populated from the input file prefix
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VolumeHeader {
    structure: u32,
    data_dimensionality: u32,
    brick_dims: V3c<u32>,
    brick_counts: V3c<u32>,
    volume_dims: V3c<u32>,
    timesteps: u32,
    padding_width: u32,
    data_size: u32,
}

impl VolumeHeader {
    /// Populates the header from the five u32 fields prefixing the input file
    /// (data dimensionality, timestep count, volume dimensions) together with
    /// the caller-provided layout parameters, and validates the geometry
    /// * `reader` - positioned at the start of the input file
    /// * `config` - source of brick dimensions and pass-through header fields
    /// * `data_size` - byte size of one scalar voxel as emitted to disk
    pub fn read_from<R: Read>(
        reader: &mut R,
        config: &TspConfig,
        data_size: u32,
    ) -> Result<Self, TspError> {
        let mut fields = [0u32; 5];
        for field in fields.iter_mut() {
            let mut bytes = [0u8; 4];
            reader.read_exact(&mut bytes).map_err(TspError::InputRead)?;
            *field = u32::from_le_bytes(bytes);
        }
        let [data_dimensionality, timesteps, x_dim, y_dim, z_dim] = fields;
        let volume_dims = V3c::new(x_dim, y_dim, z_dim);
        let brick_dims = V3c::unit(config.brick_dim);

        if !timesteps.is_power_of_two() {
            return Err(TspError::TimestepCount(timesteps));
        }
        if brick_dims.x == 0
            || volume_dims.x % brick_dims.x != 0
            || volume_dims.y % brick_dims.y != 0
            || volume_dims.z % brick_dims.z != 0
        {
            return Err(TspError::GeometryMismatch {
                volume: volume_dims,
                brick: brick_dims,
            });
        }
        let brick_counts = V3c::new(
            volume_dims.x / brick_dims.x,
            volume_dims.y / brick_dims.y,
            volume_dims.z / brick_dims.z,
        );
        if brick_counts.x != brick_counts.y
            || brick_counts.x != brick_counts.z
            || !brick_counts.x.is_power_of_two()
        {
            return Err(TspError::BrickCountNotCubic(brick_counts));
        }

        Ok(Self {
            structure: config.structure,
            data_dimensionality,
            brick_dims,
            brick_counts,
            volume_dims,
            timesteps,
            padding_width: config.padding_width,
            data_size,
        })
    }

    /// Emits the 11-field fixed header of the output file
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let fields = [
            self.structure,
            self.data_dimensionality,
            self.brick_dims.x,
            self.brick_dims.y,
            self.brick_dims.z,
            self.brick_counts.x,
            self.brick_counts.y,
            self.brick_counts.z,
            self.timesteps,
            self.padding_width,
            self.data_size,
        ];
        for field in fields {
            writer.write_all(&field.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn structure(&self) -> u32 {
        self.structure
    }

    pub fn data_dimensionality(&self) -> u32 {
        self.data_dimensionality
    }

    pub fn brick_dims(&self) -> V3c<u32> {
        self.brick_dims
    }

    pub fn brick_counts(&self) -> V3c<u32> {
        self.brick_counts
    }

    pub fn volume_dims(&self) -> V3c<u32> {
        self.volume_dims
    }

    pub fn timesteps(&self) -> u32 {
        self.timesteps
    }

    pub fn padding_width(&self) -> u32 {
        self.padding_width
    }

    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Byte offset where the voxel payload of the input file begins
    pub fn header_offset(&self) -> u64 {
        INPUT_HEADER_BYTES
    }

    /// Level count of the spatial octree; a single-brick dataset has one level
    pub fn octree_levels(&self) -> u32 {
        self.brick_counts.x.trailing_zeros() + 1
    }

    /// Number of bricks on the base (leaf) octree level
    pub fn base_brick_count(&self) -> u64 {
        self.brick_counts.volume()
    }

    /// Number of bricks in one full octree
    pub fn octree_brick_count(&self) -> u64 {
        full_octree_size(self.octree_levels())
    }

    /// Node count of the binary time tree spanning all timesteps
    pub fn bst_node_count(&self) -> u64 {
        full_binary_tree_size(self.timesteps)
    }

    pub fn brick_voxel_count(&self) -> usize {
        self.brick_dims.volume() as usize
    }

    pub fn brick_byte_count(&self) -> u64 {
        self.brick_dims.volume() * self.data_size as u64
    }

    pub fn volume_voxel_count(&self) -> usize {
        self.volume_dims.volume() as usize
    }

    pub fn timestep_byte_count(&self) -> u64 {
        self.volume_dims.volume() * self.data_size as u64
    }
}
