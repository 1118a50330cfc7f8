//! # 外部字节流接口层
//!
//! 文件系统之外的数据来源，例如宿主机上的文件。
//! [`ExternalSource`] 是对它的抽象，`copy_from_external` 经由它读入数据。

use crate::Error;

pub trait ExternalSource {
    /// 读出数据填充`buf`，返回读取的字节数；返回0表示已读完。
    ///
    /// 来源不可读时应返回 [`Error::SourceUnavailable`]。
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

impl ExternalSource for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let len = buf.len().min(self.len());
        let (head, tail) = self.split_at(len);
        buf[..len].copy_from_slice(head);
        *self = tail;

        Ok(len)
    }
}
