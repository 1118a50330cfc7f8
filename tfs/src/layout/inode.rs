//! 内存中的索引节点
//!
//! 每个文件至多占用一个数据块，写入在块尾截断而不会延伸到第二个块。
//!
//! 目录的数据块用于存放目录项；
//! 文件的数据块用于存放它的数据；
//! 符号链接不占数据块，目标路径直接存在 inode 里。

use alloc::string::String;

use crate::block_pool::BlockPool;
use crate::Error;

#[derive(Debug, Default)]
pub struct Inode {
    /// ID，同时也是在索引节点表中的下标
    pub id: u32,
    /// 类型，创建后不再改变
    pub kind: InodeKind,
    /// 已存储的字节数
    pub size: usize,
    /// 硬链接个数
    pub links: u32,
    /// 引用此 inode 的打开文件个数
    pub handles: u32,
    /// 独占的数据块
    pub data_block: Option<u32>,
    /// 符号链接指向的路径，仅在创建时写入
    pub target: String,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum InodeKind {
    #[default]
    File,
    Directory,
    SymLink,
}

impl Inode {
    #[inline]
    pub fn init(&mut self, id: u32, kind: InodeKind) {
        *self = Self {
            id,
            kind,
            links: 1,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.kind == InodeKind::SymLink
    }

    /// 清空文件，交出原先占用的数据块
    pub fn clear(&mut self) -> Option<u32> {
        self.size = 0;
        self.data_block.take()
    }

    /// 从指定位置(字节偏移)读出数据填充`buf`
    pub fn read_at(&self, offset: usize, buf: &mut [u8], pool: &BlockPool) -> Result<usize, Error> {
        let start = offset;
        let end = (start + buf.len()).min(self.size);

        if start >= end {
            return Ok(0);
        }

        let block_id = self.data_block.ok_or(Error::InvalidBlock)?;
        let read_size = end - start;
        pool.map(block_id, |data| {
            buf[..read_size].copy_from_slice(&data[start..end]);
        })?;

        Ok(read_size)
    }

    /// 从指定位置写入`buf`，超出块尾的部分被丢弃，返回实际写入的字节数。
    ///
    /// 调用者需保证 inode 已持有数据块。
    pub fn write_at(&mut self, offset: usize, buf: &[u8], pool: &BlockPool) -> Result<usize, Error> {
        let start = offset;
        let end = (start + buf.len()).min(pool.block_size());

        if start >= end {
            return Ok(0);
        }

        let block_id = self.data_block.ok_or(Error::InvalidBlock)?;
        let size = self.size;
        pool.map_mut(block_id, |data| {
            // 别的句柄截断过文件时，游标可能落在文件尾之后，空洞补零
            if start > size {
                data[size..start].fill(0);
            }
            data[start..end].copy_from_slice(&buf[..end - start]);
        })?;

        self.size = self.size.max(end);
        Ok(end - start)
    }
}
