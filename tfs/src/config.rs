//! Constants and initialization parameters of tfs

use crate::layout::DirEntry;
use crate::Error;

/// 根目录的 inode 编号，必须是第一个被创建的 inode
pub const ROOT_INUM: u32 = 0;

/// 打开文件时最多连续解析的符号链接层数，超出视为成环
pub const MAX_SYMLINK_DEPTH: usize = 8;

/// 从外部字节流拷贝时每次读写的字节数
pub const COPY_CHUNK_SIZE: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// 索引节点表容量，包括根目录
    pub max_inode_count: usize,
    /// 数据块个数
    pub max_block_count: usize,
    /// 打开文件表容量
    pub max_open_files_count: usize,
    /// 数据块大小(字节)，也是单个文件的最大长度
    pub block_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_inode_count: 64,
            max_block_count: 1024,
            max_open_files_count: 16,
            block_size: 1024,
        }
    }
}

impl Params {
    /// 各表至少有一个槽位，编号放得进`u32`；数据块至少放得下一个目录项
    pub fn validate(&self) -> Result<(), Error> {
        let counts = [
            self.max_inode_count,
            self.max_block_count,
            self.max_open_files_count,
        ];

        if counts
            .iter()
            .any(|&count| count == 0 || count > u32::MAX as usize)
            || self.block_size < DirEntry::SIZE
        {
            return Err(Error::InvalidParams);
        }

        Ok(())
    }
}
