//! # 数据块池
//!
//! 固定数量、固定大小的数据块，位于内存中。
//! 块的分配情况由位图记录，位图由池内的互斥锁保护；
//! 每个块的内容各有一把读写锁，使用者总是在持有所属 inode 的锁时访问它。
//!
//! 释放的块不会清零，再次分配时内容不确定。

use alloc::boxed::Box;
use alloc::vec;

use spin::{Mutex, RwLock};

use crate::layout::Bitmap;
use crate::Error;

#[derive(Debug)]
pub struct BlockPool {
    blocks: Box<[RwLock<Box<[u8]>>]>,
    bitmap: Mutex<Bitmap>,
    block_size: usize,
}

impl BlockPool {
    pub fn new(block_count: usize, block_size: usize) -> Self {
        let blocks = (0..block_count)
            .map(|_| RwLock::new(vec![0; block_size].into_boxed_slice()))
            .collect();

        Self {
            blocks,
            bitmap: Mutex::new(Bitmap::new(block_count)),
            block_size,
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// 分配新的数据块并返回其ID
    pub fn alloc(&self) -> Result<u32, Error> {
        self.bitmap.lock().alloc().ok_or(Error::NoSpace)
    }

    /// 调用者须独占该块，不再有任何读写
    pub fn dealloc(&self, block_id: u32) {
        self.bitmap.lock().dealloc(block_id)
    }

    #[inline]
    pub fn map<V>(&self, block_id: u32, f: impl FnOnce(&[u8]) -> V) -> Result<V, Error> {
        let block = self.get(block_id)?;
        Ok(f(&block.read()))
    }

    #[inline]
    pub fn map_mut<V>(&self, block_id: u32, f: impl FnOnce(&mut [u8]) -> V) -> Result<V, Error> {
        let block = self.get(block_id)?;
        Ok(f(&mut block.write()))
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len()
    }
}

impl BlockPool {
    #[inline]
    fn get(&self, block_id: u32) -> Result<&RwLock<Box<[u8]>>, Error> {
        self.blocks
            .get(block_id as usize)
            .ok_or(Error::InvalidBlock)
    }
}
