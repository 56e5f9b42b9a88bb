// Payload I/O casts voxel buffers to raw bytes in place, so the emitted
// little-endian format is only produced correctly on little-endian hosts.
#[cfg(target_endian = "big")]
compile_error!("tempovox emits little-endian files and requires a little-endian host");

pub mod brick;
pub mod spatial;
pub mod tsp;

/// Scalar voxel type written to disk; its byte size ends up in the file header.
pub type Real = f32;
