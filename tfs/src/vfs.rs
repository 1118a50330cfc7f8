//! # 文件操作层
//!
//! 在各张表之上实现类 POSIX 的文件接口。
//! 路径一律形如`/name`：先锁根目录查名字，再锁目标 inode。

use alloc::string::String;
use alloc::vec::Vec;

use enumflags2::BitFlags;

use crate::config::{COPY_CHUNK_SIZE, MAX_SYMLINK_DEPTH};
use crate::layout::{Inode, InodeKind};
use crate::open_file::{FileHandle, OpenFlag};
use crate::{directory, path};
use crate::{Dirent, Error, ExternalSource, Stat, TinyFileSystem};

impl TinyFileSystem {
    /// 打开文件并返回句柄。
    ///
    /// 目标是符号链接时，以同样的标志打开它指向的路径。
    pub fn open(&self, path: &str, flags: BitFlags<OpenFlag>) -> Result<FileHandle, Error> {
        self.open_at_depth(path, flags, 0)
    }

    /// 从句柄的游标处读出数据填充`buf`，到达文件尾时返回0
    pub fn read(&self, fd: FileHandle, buf: &mut [u8]) -> Result<usize, Error> {
        self.open_files.map_mut(fd, |file| {
            let inode = self.inodes.read(file.inumber)?;
            let read_size = inode.read_at(file.offset, buf, &self.blocks)?;
            file.offset += read_size;

            log::trace!("read {read_size} bytes from inode {}", file.inumber);
            Ok(read_size)
        })
    }

    /// 从句柄的游标处写入`buf`。
    ///
    /// 文件只有一个数据块，越过块尾的部分不会写入，
    /// 因此返回的字节数可能小于`buf.len()`。
    pub fn write(&self, fd: FileHandle, buf: &[u8]) -> Result<usize, Error> {
        self.open_files.map_mut(fd, |file| {
            let mut inode = self.inodes.write(file.inumber)?;

            let len = buf
                .len()
                .min(self.block_size().saturating_sub(file.offset));
            if len == 0 {
                return Ok(0);
            }

            self.expand(&mut inode)?;
            let written_size = inode.write_at(file.offset, &buf[..len], &self.blocks)?;
            file.offset += written_size;

            log::trace!("wrote {written_size} bytes to inode {}", file.inumber);
            Ok(written_size)
        })
    }

    pub fn close(&self, fd: FileHandle) -> Result<(), Error> {
        // 先放掉句柄的锁，再去锁 inode
        let file = self.open_files.release(fd)?;
        let mut inode = self.inodes.write(file.inumber)?;
        debug_assert!(inode.handles > 0);
        inode.handles -= 1;

        Ok(())
    }

    /// 为`target`增加名为`link_name`的硬链接
    pub fn link(&self, target: &str, link_name: &str) -> Result<(), Error> {
        let target_name = path::root_relative(target)?;
        let link_name = path::root_relative(link_name)?;

        let mut root = self.lock_root()?;
        let inode_id = directory::find(&root, target_name, &self.blocks)?.ok_or(Error::NotFound)?;
        let mut inode = self.lock_child(&root, inode_id)?;

        // 不允许硬链接到符号链接
        if inode.is_symlink() {
            return Err(Error::Unsupported);
        }

        directory::add(&mut root, link_name, inode_id, &self.blocks)?;
        inode.links += 1;

        log::debug!("{link_name:?} linked to inode {inode_id}, links={}", inode.links);
        Ok(())
    }

    /// 创建名为`link_name`的符号链接，`target`按原样保存，不做解析
    pub fn symlink(&self, target: &str, link_name: &str) -> Result<(), Error> {
        let link_name = path::root_relative(link_name)?;

        let mut root = self.lock_root()?;
        let inode_id = self.inodes.create(InodeKind::SymLink)?;
        let mut inode = self.lock_child(&root, inode_id)?;
        inode.target = String::from(target);

        if let Err(err) = directory::add(&mut root, link_name, inode_id, &self.blocks) {
            self.inodes.delete(inode);
            return Err(err);
        }

        log::debug!("{link_name:?} -> {target:?}");
        Ok(())
    }

    /// 删除目录项。
    ///
    /// 符号链接直接销毁；普通文件的硬链接数归零时才销毁并释放数据块。
    /// 仍被打开的文件不能删去最后一个名字。
    pub fn unlink(&self, path: &str) -> Result<(), Error> {
        let name = path::root_relative(path)?;

        let root = self.lock_root()?;
        let inode_id = directory::find(&root, name, &self.blocks)?.ok_or(Error::NotFound)?;
        let mut inode = self.lock_child(&root, inode_id)?;

        if inode.is_symlink() {
            directory::clear(&root, name, &self.blocks)?;
            self.inodes.delete(inode);
            return Ok(());
        }

        if inode.links == 1 && inode.handles > 0 {
            log::debug!("inode {inode_id} still has {} open handles", inode.handles);
            return Err(Error::Busy);
        }

        directory::clear(&root, name, &self.blocks)?;
        inode.links -= 1;
        if inode.links == 0 {
            self.truncate(&mut inode);
            self.inodes.delete(inode);
        }

        Ok(())
    }

    /// 把外部字节流的全部内容拷贝到`dest_path`。
    ///
    /// 目标文件会被创建或清空；放不下时返回 [`Error::PartialCopy`]，
    /// 已写入的部分保留。
    pub fn copy_from_external(
        &self,
        source: &mut impl ExternalSource,
        dest_path: &str,
    ) -> Result<(), Error> {
        let fd = self.open(
            dest_path,
            OpenFlag::CREATE | OpenFlag::TRUNC | OpenFlag::APPEND,
        )?;
        let copied = self.copy_chunks(source, fd);
        let closed = self.close(fd);

        copied.and(closed)
    }

    /// 不跟随符号链接
    pub fn stat(&self, path: &str) -> Result<Stat, Error> {
        let name = path::root_relative(path)?;

        let root = self.read_root()?;
        let inode_id = directory::find(&root, name, &self.blocks)?.ok_or(Error::NotFound)?;
        let inode = self.read_child(&root, inode_id)?;

        Ok(Stat::new(&inode, self.block_size()))
    }

    /// 读取符号链接保存的路径
    pub fn read_link(&self, path: &str) -> Result<String, Error> {
        let name = path::root_relative(path)?;

        let root = self.read_root()?;
        let inode_id = directory::find(&root, name, &self.blocks)?.ok_or(Error::NotFound)?;
        let inode = self.read_child(&root, inode_id)?;

        if !inode.is_symlink() {
            return Err(Error::Unsupported);
        }
        Ok(inode.target.clone())
    }

    /// 列出根目录下的全部项
    pub fn read_dir(&self) -> Result<Vec<Dirent>, Error> {
        let root = self.read_root()?;

        directory::entries(&root, &self.blocks)?
            .into_iter()
            .map(|dir_entry| -> Result<Dirent, Error> {
                let inode = self.read_child(&root, dir_entry.inode_id())?;
                Ok(Dirent {
                    inode: inode.id as u64,
                    kind: inode.kind.into(),
                    name: String::from(dir_entry.name()),
                })
            })
            .collect()
    }
}

impl TinyFileSystem {
    fn open_at_depth(
        &self,
        path: &str,
        flags: BitFlags<OpenFlag>,
        depth: usize,
    ) -> Result<FileHandle, Error> {
        let name = path::root_relative(path)?;
        let mut root = self.lock_root()?;

        let Some(inode_id) = directory::find(&root, name, &self.blocks)? else {
            if !flags.contains(OpenFlag::CREATE) {
                return Err(Error::NotFound);
            }
            return self.create_file(&mut root, name);
        };

        let mut inode = self.lock_child(&root, inode_id)?;
        if inode.is_symlink() {
            let target = inode.target.clone();
            drop(inode);
            drop(root);

            if depth == MAX_SYMLINK_DEPTH {
                log::warn!("gave up resolving {path:?} after {depth} symlinks");
                return Err(Error::SymlinkLoop);
            }
            return self.open_at_depth(&target, flags, depth + 1);
        }

        let offset = if flags.contains(OpenFlag::APPEND) && !flags.contains(OpenFlag::TRUNC) {
            inode.size
        } else {
            0
        };
        // 句柄在根目录锁内登记，unlink 看到的 handles 总是准确的
        let fd = self.open_files.register(inode_id, offset)?;
        if flags.contains(OpenFlag::TRUNC) {
            self.truncate(&mut inode);
        }
        inode.handles += 1;

        Ok(fd)
    }

    fn create_file(&self, root: &mut Inode, name: &str) -> Result<FileHandle, Error> {
        let inode_id = self.inodes.create(InodeKind::File)?;

        if let Err(err) = directory::add(root, name, inode_id, &self.blocks) {
            // 目录放不下，回滚刚创建的 inode
            self.inodes.delete(self.lock_child(root, inode_id)?);
            return Err(err);
        }

        // NOTE: 打开文件表已满时，文件保持已创建的状态
        let fd = self.open_files.register(inode_id, 0)?;
        self.lock_child(root, inode_id)?.handles += 1;

        Ok(fd)
    }

    /// 空文件在第一次写入时分配数据块
    fn expand(&self, inode: &mut Inode) -> Result<(), Error> {
        if inode.data_block.is_none() {
            inode.data_block = Some(self.blocks.alloc()?);
        }

        Ok(())
    }

    fn truncate(&self, inode: &mut Inode) {
        if let Some(block_id) = inode.clear() {
            self.blocks.dealloc(block_id);
        }
    }

    fn copy_chunks(&self, source: &mut impl ExternalSource, fd: FileHandle) -> Result<(), Error> {
        let mut chunk = [0; COPY_CHUNK_SIZE];

        loop {
            let read_size = source.read(&mut chunk).map_err(|err| {
                log::warn!("external source failed: {err}");
                Error::SourceUnavailable
            })?;
            if read_size == 0 {
                return Ok(());
            }

            let written_size = self.write(fd, &chunk[..read_size])?;
            if written_size != read_size {
                log::warn!("copy stopped: {written_size} of {read_size} bytes fit");
                return Err(Error::PartialCopy);
            }
        }
    }
}
