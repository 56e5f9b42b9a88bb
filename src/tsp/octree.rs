use crate::brick::Brick;
use crate::spatial::math::{flat_projection, vector::V3c, zorder};
use crate::tsp::types::{TspError, VolumeHeader};
use bytemuck::Pod;
use num_traits::Float;
use std::io::{Read, Seek, SeekFrom, Write};

/// Builds one full octree of bricks per timestep and appends every octree to
/// the scratch file as raw voxel payload: leaves in Z-order first, then the
/// upstream levels with children always preceding their parent, the root last.
pub(crate) fn write_octrees<T: Float + Pod, R: Read + Seek, W: Write>(
    header: &VolumeHeader,
    input: &mut R,
    scratch: &mut W,
) -> Result<(), TspError> {
    let volume_dims = header.volume_dims();
    let brick_dims = header.brick_dims();
    let brick_counts = header.brick_counts();
    let base_count = header.base_brick_count() as usize;
    let octree_count = header.octree_brick_count() as usize;

    for timestep in 0..header.timesteps() {
        log::debug!("building octree for timestep {}", timestep);

        // the whole timestep payload stays in memory while carving
        let payload_offset =
            header.header_offset() + timestep as u64 * header.timestep_byte_count();
        input
            .seek(SeekFrom::Start(payload_offset))
            .map_err(TspError::InputRead)?;
        let mut voxels = vec![T::zero(); header.volume_voxel_count()];
        input
            .read_exact(bytemuck::cast_slice_mut(&mut voxels))
            .map_err(TspError::InputRead)?;

        // carve base bricks, one per subvolume, in natural x-fastest order
        let mut base_bricks = Vec::with_capacity(base_count);
        for z_brick in 0..brick_counts.z {
            for y_brick in 0..brick_counts.y {
                for x_brick in 0..brick_counts.x {
                    base_bricks.push(carve_brick(
                        &voxels,
                        volume_dims,
                        brick_dims,
                        V3c::new(x_brick, y_brick, z_brick),
                    ));
                }
            }
        }
        drop(voxels);

        // the Z-order permutation puts the eight children of every parent
        // node into eight consecutive slots
        let mut slots: Vec<Option<Brick<T>>> = (0..base_count).map(|_| None).collect();
        let mut natural = base_bricks.into_iter();
        for z_brick in 0..brick_counts.z {
            for y_brick in 0..brick_counts.y {
                for x_brick in 0..brick_counts.x {
                    let slot = zorder(x_brick, y_brick, z_brick) as usize;
                    *slots.get_mut(slot).ok_or(TspError::ZOrderOutOfRange)? = natural.next();
                }
            }
        }
        let mut octree: Vec<Brick<T>> = slots
            .into_iter()
            .collect::<Option<_>>()
            .ok_or(TspError::ZOrderOutOfRange)?;

        // fill the higher levels bottom-up from consecutive sibling groups
        octree.reserve_exact(octree_count - octree.len());
        let mut child_pos = 0;
        while octree.len() < octree_count {
            let filtered: [Brick<T>; 8] =
                core::array::from_fn(|child| octree[child_pos + child].filter());
            octree.push(Brick::combine(&filtered)?);
            child_pos += 8;
        }

        for brick in octree {
            brick.write_to(scratch).map_err(TspError::ScratchIo)?;
        }
    }
    Ok(())
}

/// Copies the subvolume belonging to one base-level brick out of the flat
/// timestep payload
fn carve_brick<T: Float>(
    voxels: &[T],
    volume_dims: V3c<u32>,
    brick_dims: V3c<u32>,
    brick_coord: V3c<u32>,
) -> Brick<T> {
    let origin = brick_coord * brick_dims;
    let mut brick = Brick::new(brick_dims, T::zero());
    for z in 0..brick_dims.z {
        for y in 0..brick_dims.y {
            for x in 0..brick_dims.x {
                let global = flat_projection(
                    (origin.x + x) as usize,
                    (origin.y + y) as usize,
                    (origin.z + z) as usize,
                    volume_dims.x as usize,
                    volume_dims.y as usize,
                );
                brick.set(x, y, z, voxels[global]);
            }
        }
    }
    brick
}
