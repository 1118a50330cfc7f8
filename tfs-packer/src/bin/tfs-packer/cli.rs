use std::path::PathBuf;

use clap::Parser;
use tfs::Params;

/// Copy host files into an in-memory tfs and list its root directory
#[derive(Parser)]
pub struct Cli {
    /// Host files to copy, each lands at `/<file name>`
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Capacity of the inode table, including the root directory
    #[arg(long, default_value_t = Params::default().max_inode_count)]
    pub max_inodes: usize,

    /// Number of data blocks
    #[arg(long, default_value_t = Params::default().max_block_count)]
    pub max_blocks: usize,

    /// Capacity of the open file table
    #[arg(long, default_value_t = Params::default().max_open_files_count)]
    pub max_open_files: usize,

    /// Size of a data block in bytes
    #[arg(long, default_value_t = Params::default().block_size)]
    pub block_size: usize,
}

impl Cli {
    pub fn params(&self) -> Params {
        Params {
            max_inode_count: self.max_inodes,
            max_block_count: self.max_blocks,
            max_open_files_count: self.max_open_files,
            block_size: self.block_size,
        }
    }
}
