pub mod bst;
pub mod octree;
pub mod types;

pub use types::{TspConfig, TspError, VolumeHeader};

use crate::Real;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sequences the whole pipeline: populate the header from the input prefix,
/// write one octree per timestep into a scratch file, then reorder the
/// scratch bricks into time-BST blocks in the output file. The scratch file
/// lives next to the output and is removed on every exit path.
pub struct TspBuilder {
    config: TspConfig,
}

impl TspBuilder {
    pub fn new(config: TspConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TspConfig {
        &self.config
    }

    /// Runs the pipeline to completion, returning the populated header
    pub fn construct(&self) -> Result<VolumeHeader, TspError> {
        if self.config.brick_dim == 0 {
            warn!("one or more brick dimensions are zero");
        }

        let mut input = File::open(&self.config.input_path).map_err(TspError::InputRead)?;
        let header = VolumeHeader::read_from(
            &mut input,
            &self.config,
            std::mem::size_of::<Real>() as u32,
        )?;

        info!("input file:          {}", self.config.input_path.display());
        info!("data dimensionality: {}", header.data_dimensionality());
        info!("timesteps:           {}", header.timesteps());
        info!(
            "volume dimensions:   {} x {} x {}",
            header.volume_dims().x,
            header.volume_dims().y,
            header.volume_dims().z
        );
        info!(
            "brick dimensions:    {} x {} x {}",
            header.brick_dims().x,
            header.brick_dims().y,
            header.brick_dims().z
        );
        info!(
            "brick counts:        {} x {} x {}",
            header.brick_counts().x,
            header.brick_counts().y,
            header.brick_counts().z
        );
        info!("structure:           {}", header.structure());
        info!("data size (bytes):   {}", header.data_size());
        info!("octree levels:       {}", header.octree_levels());
        info!("bricks in base level: {}", header.base_brick_count());
        info!("bricks per octree:   {}", header.octree_brick_count());
        info!("nodes per time tree: {}", header.bst_node_count());

        // dropped on every return path below, which also deletes the file
        let scratch_dir = match self.config.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut scratch =
            tempfile::NamedTempFile::new_in(scratch_dir).map_err(TspError::ScratchIo)?;

        info!("building octrees");
        {
            let mut writer = BufWriter::new(scratch.as_file_mut());
            octree::write_octrees::<Real, _, _>(&header, &mut input, &mut writer)?;
            writer.flush().map_err(TspError::ScratchIo)?;
        }
        drop(input);

        info!("assembling time trees");
        let out_file =
            File::create(&self.config.output_path).map_err(TspError::OutputWrite)?;
        let mut out = BufWriter::new(out_file);
        bst::write_tsp::<Real, _, _>(&header, scratch.as_file_mut(), &mut out)?;
        out.flush().map_err(TspError::OutputWrite)?;

        info!("output file:         {}", self.config.output_path.display());
        Ok(header)
    }
}
