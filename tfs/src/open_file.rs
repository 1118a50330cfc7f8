//! # 打开文件表
//!
//! 定长的句柄表。每个槽位各有一把互斥锁保护游标，
//! 同一句柄上的读写互相串行，不同句柄之间互不干扰；
//! 槽位的分配由表内的位图与其互斥锁负责。

use alloc::boxed::Box;

use derive_more::{From, Into};
use enumflags2::{bitflags, BitFlags};
use spin::Mutex;

use crate::layout::Bitmap;
use crate::Error;

/// 打开文件的句柄，即打开文件表的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
#[repr(transparent)]
pub struct FileHandle(usize);

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 文件不存在时创建
    CREATE = 0b001,
    /// 先清空文件，再交给用户
    TRUNC  = 0b010,
    /// 游标从文件尾开始
    APPEND = 0b100,
}

impl OpenFlag {
    // enumflags2拒绝值为0的标志
    /// 只打开已存在的文件，游标从头开始
    #[inline]
    pub fn existing() -> BitFlags<OpenFlag> {
        BitFlags::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    pub inumber: u32,
    /// **文件**内的偏移量
    pub offset: usize,
}

#[derive(Debug)]
pub struct OpenFileTable {
    files: Box<[Mutex<Option<OpenFile>>]>,
    bitmap: Mutex<Bitmap>,
}

impl OpenFileTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            files: (0..capacity).map(|_| Mutex::new(None)).collect(),
            bitmap: Mutex::new(Bitmap::new(capacity)),
        }
    }

    pub fn register(&self, inumber: u32, offset: usize) -> Result<FileHandle, Error> {
        let index = self.bitmap.lock().alloc().ok_or(Error::TableFull)? as usize;
        *self.files[index].lock() = Some(OpenFile { inumber, offset });

        Ok(FileHandle(index))
    }

    /// 持有句柄的锁，以某种方式使用或修改它
    pub fn map_mut<V>(
        &self,
        fd: FileHandle,
        f: impl FnOnce(&mut OpenFile) -> Result<V, Error>,
    ) -> Result<V, Error> {
        let mut file = self.slot(fd)?.lock();
        f(file.as_mut().ok_or(Error::InvalidHandle)?)
    }

    /// 释放句柄，之后再使用它会失败
    pub fn release(&self, fd: FileHandle) -> Result<OpenFile, Error> {
        let file = self.slot(fd)?.lock().take().ok_or(Error::InvalidHandle)?;
        self.bitmap.lock().dealloc(fd.0 as u32);

        Ok(file)
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.files.len()
    }
}

impl OpenFileTable {
    #[inline]
    fn slot(&self, fd: FileHandle) -> Result<&Mutex<Option<OpenFile>>, Error> {
        self.files.get(fd.0).ok_or(Error::InvalidHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_reused_after_release() {
        let table = OpenFileTable::new(2);
        let a = table.register(3, 0).unwrap();
        let b = table.register(3, 5).unwrap();
        assert_ne!(a, b);
        assert_eq!(table.register(4, 0), Err(Error::TableFull));

        assert_eq!(
            table.release(a),
            Ok(OpenFile {
                inumber: 3,
                offset: 0
            })
        );
        assert_eq!(table.release(a), Err(Error::InvalidHandle));
        assert_eq!(table.register(4, 0), Ok(a));
        assert_eq!(table.used(), 2);
    }

    #[test]
    fn cursor_moves_through_map_mut() {
        let table = OpenFileTable::new(1);
        let fd = table.register(1, 0).unwrap();
        table
            .map_mut(fd, |file| {
                file.offset += 10;
                Ok(())
            })
            .unwrap();

        assert_eq!(table.map_mut(fd, |file| Ok(file.offset)), Ok(10));
        assert_eq!(
            table.map_mut(FileHandle::from(7), |file| Ok(file.offset)),
            Err(Error::InvalidHandle)
        );
    }
}
