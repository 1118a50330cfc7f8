use core::str;

const NAME_MAX_LEN: usize = 27;

/// 目录数据块中的目录项，名字为空即空槽位
#[derive(Debug, Default, Clone)]
pub struct DirEntry {
    // 最后一字节留给 \0
    name: [u8; NAME_MAX_LEN + 1],
    inode_id: u32,
}

impl DirEntry {
    /// 目录项大小恒为32字节
    pub const SIZE: usize = 32;

    pub const NAME_MAX_LEN: usize = NAME_MAX_LEN;

    #[inline]
    pub fn new(name: &str, inode_id: u32) -> Self {
        let bytes = name.as_bytes();
        debug_assert!(bytes.len() <= NAME_MAX_LEN);

        let mut name = [0; NAME_MAX_LEN + 1];
        name[..bytes.len()].copy_from_slice(bytes);

        Self { name, inode_id }
    }

    /// 从块内的一个槽位解出目录项，`bytes`长度为[`DirEntry::SIZE`]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut name = [0; NAME_MAX_LEN + 1];
        name.copy_from_slice(&bytes[..NAME_MAX_LEN + 1]);
        let mut inode_id = [0; 4];
        inode_id.copy_from_slice(&bytes[NAME_MAX_LEN + 1..Self::SIZE]);

        Self {
            name,
            inode_id: u32::from_le_bytes(inode_id),
        }
    }

    pub fn write_to(&self, bytes: &mut [u8]) {
        bytes[..NAME_MAX_LEN + 1].copy_from_slice(&self.name);
        bytes[NAME_MAX_LEN + 1..Self::SIZE].copy_from_slice(&self.inode_id.to_le_bytes());
    }

    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(NAME_MAX_LEN);
        str::from_utf8(&self.name[..len]).unwrap_or_default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name[0] == 0
    }

    #[inline]
    pub fn inode_id(&self) -> u32 {
        self.inode_id
    }
}
