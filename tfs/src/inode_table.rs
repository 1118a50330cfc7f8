//! # 索引节点表
//!
//! 定长的 inode 数组，下标即 inode 编号。
//! 每个 inode 自带一把读写锁；空闲与否由位图记录，位图由表内互斥锁保护。

use alloc::boxed::Box;

use spin::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::layout::{Bitmap, Inode, InodeKind};
use crate::Error;

pub type InodeReadGuard<'a> = RwLockReadGuard<'a, Inode>;
pub type InodeWriteGuard<'a> = RwLockWriteGuard<'a, Inode>;

#[derive(Debug)]
pub struct InodeTable {
    inodes: Box<[RwLock<Inode>]>,
    bitmap: Mutex<Bitmap>,
}

impl InodeTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            inodes: (0..capacity)
                .map(|_| RwLock::new(Inode::default()))
                .collect(),
            bitmap: Mutex::new(Bitmap::new(capacity)),
        }
    }

    /// 分配新的 inode 并返回其ID
    pub fn create(&self, kind: InodeKind) -> Result<u32, Error> {
        let id = self.bitmap.lock().alloc().ok_or(Error::NoSpace)?;
        // 槽位已在位图中预留，此时无人知道这个ID，锁不会有竞争
        self.inodes[id as usize].write().init(id, kind);
        log::debug!("inode {id} created as {kind:?}");

        Ok(id)
    }

    pub fn read(&self, id: u32) -> Result<InodeReadGuard<'_>, Error> {
        Ok(self.slot(id)?.read())
    }

    pub fn write(&self, id: u32) -> Result<InodeWriteGuard<'_>, Error> {
        Ok(self.slot(id)?.write())
    }

    /// 交还 inode 的槽位。
    ///
    /// 持有写锁即证明独占；调用者已释放其数据块，并删去了指向它的目录项。
    pub fn delete(&self, mut inode: InodeWriteGuard<'_>) {
        let id = inode.id;
        debug_assert!(inode.data_block.is_none());
        debug_assert_eq!(inode.handles, 0);

        *inode = Inode::default();
        drop(inode);

        self.bitmap.lock().dealloc(id);
        log::debug!("inode {id} deleted");
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inodes.len()
    }
}

impl InodeTable {
    fn slot(&self, id: u32) -> Result<&RwLock<Inode>, Error> {
        if !self.bitmap.lock().is_allocated(id) {
            return Err(Error::NotFound);
        }

        Ok(&self.inodes[id as usize])
    }
}
