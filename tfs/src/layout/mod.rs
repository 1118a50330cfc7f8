//! # 数据结构层
//!
//! 各张表的槽位布局：
//! 位图 | 索引节点 | 目录数据块中的目录项

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::{Inode, InodeKind};

/// 目录项，存放在目录的数据块中
mod dir_entry;
pub use dir_entry::DirEntry;
