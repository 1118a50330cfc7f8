//! # 目录项存储
//!
//! 目录的数据块被切成若干 [`DirEntry`] 槽位，线性扫描完成查找、插入与删除。
//! 数据块在插入第一个目录项时才分配。
//!
//! 目录项只是名字到 inode 编号的映射，增删目录项都不会改动被指向的 inode。

use alloc::vec::Vec;

use crate::block_pool::BlockPool;
use crate::layout::{DirEntry, Inode};
use crate::Error;

/// 根据名字获取目录项的 inode ID
pub fn find(dir: &Inode, name: &str, pool: &BlockPool) -> Result<Option<u32>, Error> {
    debug_assert!(dir.is_dir());
    let Some(block_id) = dir.data_block else {
        return Ok(None);
    };

    pool.map(block_id, |data| {
        slots(data)
            .find(|dir_entry| !dir_entry.is_empty() && dir_entry.name() == name)
            .map(|dir_entry| dir_entry.inode_id())
    })
}

/// 在第一个空槽位写入目录项
pub fn add(dir: &mut Inode, name: &str, inode_id: u32, pool: &BlockPool) -> Result<(), Error> {
    debug_assert!(dir.is_dir());
    if find(dir, name, pool)?.is_some() {
        return Err(Error::AlreadyExists);
    }

    let block_id = match dir.data_block {
        Some(block_id) => block_id,
        None => {
            let block_id = pool.alloc()?;
            // 复用的块内容不确定，清零后全是空槽位
            pool.map_mut(block_id, |data| data.fill(0))?;
            dir.data_block = Some(block_id);
            block_id
        }
    };

    pool.map_mut(block_id, |data| {
        let slot = data
            .chunks_exact_mut(DirEntry::SIZE)
            .find(|slot| DirEntry::from_bytes(slot).is_empty())
            .ok_or(Error::NoSpace)?;
        DirEntry::new(name, inode_id).write_to(slot);
        Ok::<_, Error>(())
    })?
}

/// 根据名字删除目录项并返回其 inode ID
pub fn clear(dir: &Inode, name: &str, pool: &BlockPool) -> Result<Option<u32>, Error> {
    debug_assert!(dir.is_dir());
    let Some(block_id) = dir.data_block else {
        return Ok(None);
    };

    pool.map_mut(block_id, |data| {
        data.chunks_exact_mut(DirEntry::SIZE).find_map(|slot| {
            let dir_entry = DirEntry::from_bytes(slot);
            (!dir_entry.is_empty() && dir_entry.name() == name).then(|| {
                slot.fill(0);
                dir_entry.inode_id()
            })
        })
    })
}

/// 目录下所有有效的目录项
pub fn entries(dir: &Inode, pool: &BlockPool) -> Result<Vec<DirEntry>, Error> {
    debug_assert!(dir.is_dir());
    let Some(block_id) = dir.data_block else {
        return Ok(Vec::new());
    };

    pool.map(block_id, |data| {
        slots(data)
            .filter(|dir_entry| !dir_entry.is_empty())
            .collect()
    })
}

fn slots(data: &[u8]) -> impl Iterator<Item = DirEntry> + '_ {
    data.chunks_exact(DirEntry::SIZE).map(DirEntry::from_bytes)
}
