use alloc::string::String;

use crate::layout::{Inode, InodeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub inode: u64,
    pub kind: StatKind,
    /// 硬链接个数
    pub links: u32,
    /// File size
    pub size: u64,
    /// Occupying blocks
    pub blocks: u64,
    pub block_size: u64,
}

#[allow(clippy::upper_case_acronyms)]
#[repr(u32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatKind {
    DIR = 0o040000,
    #[default]
    FILE = 0o100000,
    LNK = 0o120000,
}

/// 根目录下的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirent {
    pub inode: u64,
    pub kind: StatKind,
    pub name: String,
}

/// 各张表的占用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub inodes: usize,
    pub max_inodes: usize,
    pub blocks: usize,
    pub max_blocks: usize,
    pub open_files: usize,
    pub max_open_files: usize,
}

impl Stat {
    pub(crate) fn new(inode: &Inode, block_size: usize) -> Self {
        Self {
            inode: inode.id as u64,
            kind: inode.kind.into(),
            links: inode.links,
            size: inode.size as u64,
            blocks: inode.data_block.is_some() as u64,
            block_size: block_size as u64,
        }
    }
}

impl From<InodeKind> for StatKind {
    #[inline]
    fn from(kind: InodeKind) -> Self {
        match kind {
            InodeKind::Directory => Self::DIR,
            InodeKind::File => Self::FILE,
            InodeKind::SymLink => Self::LNK,
        }
    }
}
