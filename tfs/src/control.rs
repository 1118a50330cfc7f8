//! # 文件系统层
//!
//! 持有三张进程内共享的表，构造完成即可使用，析构即销毁。
//!
//! ## 加锁顺序
//!
//! 1. 打开文件表中某个句柄的锁(仅 read/write)
//! 2. 根目录 inode
//! 3. 一个非根 inode
//! 4. 位图与数据块的锁，只在最内层短暂持有
//!
//! 同时持有两把 inode 锁时只能是"先目录、后子项"，
//! 根目录编号最小，这也就是编号递增的顺序；
//! 子项的锁一律经由 [`TinyFileSystem::lock_child`] 获取。

use crate::block_pool::BlockPool;
use crate::config::{Params, ROOT_INUM};
use crate::inode_table::{InodeReadGuard, InodeTable, InodeWriteGuard};
use crate::layout::{Inode, InodeKind};
use crate::open_file::OpenFileTable;
use crate::{Error, Usage};

#[derive(Debug)]
pub struct TinyFileSystem {
    params: Params,
    pub(crate) inodes: InodeTable,
    pub(crate) blocks: BlockPool,
    pub(crate) open_files: OpenFileTable,
}

impl TinyFileSystem {
    pub fn new(params: Params) -> Result<Self, Error> {
        params.validate()?;

        let fs = Self {
            params,
            inodes: InodeTable::new(params.max_inode_count),
            blocks: BlockPool::new(params.max_block_count, params.block_size),
            open_files: OpenFileTable::new(params.max_open_files_count),
        };

        let root = fs.inodes.create(InodeKind::Directory)?;
        if root != ROOT_INUM {
            log::error!("root directory got inode {root}");
            return Err(Error::InvalidParams);
        }
        log::debug!("tfs initialized with {params:?}");

        Ok(fs)
    }

    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.params.block_size
    }

    pub fn usage(&self) -> Usage {
        Usage {
            inodes: self.inodes.used(),
            max_inodes: self.inodes.capacity(),
            blocks: self.blocks.used(),
            max_blocks: self.blocks.capacity(),
            open_files: self.open_files.used(),
            max_open_files: self.open_files.capacity(),
        }
    }
}

impl TinyFileSystem {
    #[inline]
    pub(crate) fn lock_root(&self) -> Result<InodeWriteGuard<'_>, Error> {
        self.inodes.write(ROOT_INUM)
    }

    #[inline]
    pub(crate) fn read_root(&self) -> Result<InodeReadGuard<'_>, Error> {
        self.inodes.read(ROOT_INUM)
    }

    /// 持有目录的锁时，独占地锁住其下的 inode
    pub(crate) fn lock_child(&self, dir: &Inode, id: u32) -> Result<InodeWriteGuard<'_>, Error> {
        Self::check_order(dir, id);
        self.inodes.write(id)
    }

    /// 持有目录的锁时，共享地锁住其下的 inode
    pub(crate) fn read_child(&self, dir: &Inode, id: u32) -> Result<InodeReadGuard<'_>, Error> {
        Self::check_order(dir, id);
        self.inodes.read(id)
    }

    #[inline]
    fn check_order(dir: &Inode, id: u32) {
        assert!(dir.is_dir());
        assert!(
            dir.id < id,
            "inode {id} locked after directory {}",
            dir.id
        );
    }
}

impl Drop for TinyFileSystem {
    fn drop(&mut self) {
        log::debug!("tfs destroyed, {:?}", self.usage());
    }
}
