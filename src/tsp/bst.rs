use crate::brick::Brick;
use crate::spatial::octree_level_size;
use crate::tsp::types::{TspError, VolumeHeader};
use bytemuck::Pod;
use num_traits::Float;
use std::io::{Read, Seek, SeekFrom, Write};

/// Streams the scratch file level by level and writes the final file: the
/// fixed header, then one time-BST block per octree node. Octree levels are
/// emitted root level first; within a BST block the bricks appear in index
/// order, the all-timesteps average at the front and the per-timestep leaves
/// at the back.
pub(crate) fn write_tsp<T: Float + Pod, R: Read + Seek, W: Write>(
    header: &VolumeHeader,
    scratch: &mut R,
    out: &mut W,
) -> Result<(), TspError> {
    header.write_to(out).map_err(TspError::OutputWrite)?;

    let brick_dims = header.brick_dims();
    let octree_count = header.octree_brick_count();
    let timesteps = header.timesteps() as u64;
    let brick_bytes = header.brick_byte_count();

    // walk the octree levels backwards; level k holds 8^k nodes, the root
    // level being k = 0, so the brick offset into a scratch octree block
    // shrinks from the root position towards the leaves
    let mut octree_pos = octree_count;
    for level in 0..header.octree_levels() {
        let nodes_at_level = octree_level_size(level);
        octree_pos -= nodes_at_level;
        log::debug!(
            "assembling time trees for octree level {} ({} nodes)",
            level,
            nodes_at_level
        );

        for node in 0..nodes_at_level {
            // the leaf row holds this node's brick from every timestep
            let mut row: Vec<Brick<T>> = Vec::with_capacity(timesteps as usize);
            for timestep in 0..timesteps {
                let offset = (octree_pos + node + timestep * octree_count) * brick_bytes;
                scratch
                    .seek(SeekFrom::Start(offset))
                    .map_err(TspError::ScratchIo)?;
                let brick =
                    Brick::read_from(brick_dims, scratch).map_err(TspError::ScratchIo)?;
                row.push(brick);
            }

            // average pairs upwards until a single root brick remains
            let mut rows = vec![row];
            while rows[rows.len() - 1].len() > 1 {
                let previous = &rows[rows.len() - 1];
                let mut averaged = Vec::with_capacity(previous.len() / 2);
                for pair in previous.chunks_exact(2) {
                    averaged.push(Brick::average(&pair[0], &pair[1])?);
                }
                rows.push(averaged);
            }

            // emit in tree index order: root first, leaves last
            for row in rows.iter().rev() {
                for brick in row {
                    brick.write_to(out).map_err(TspError::OutputWrite)?;
                }
            }
        }
    }
    Ok(())
}
