#![cfg_attr(not(test), no_std)]

extern crate alloc;

/* tfs 的整体架构，自上而下 */

// 文件操作层：实现 open、read、write、link 等接口
mod vfs;

// 文件系统层：持有各张表，规定加锁顺序
mod control;

// 表层：索引节点表、数据块池、目录项存储、打开文件表
mod block_pool;
mod directory;
mod inode_table;
mod open_file;

// 数据结构层：表示各张表中槽位的数据结构
mod layout;

// 外部字节流接口层：拷贝外部数据的来源
mod source;

pub mod config;
mod error;
mod path;
mod stat;

pub use enumflags2::BitFlags;

pub use self::{
    config::Params,
    control::TinyFileSystem,
    error::Error,
    open_file::{FileHandle, OpenFlag},
    source::ExternalSource,
    stat::{Dirent, Stat, StatKind, Usage},
};
