
use std::fs::File;
use std::io::{ErrorKind, Read};

use tfs::{Error, ExternalSource};

/// 宿主机上的字节流，作为拷贝进 tfs 的数据来源
#[derive(Debug)]
pub struct HostFile<R = File>(pub R);

impl<R: Read> ExternalSource for HostFile<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        loop {
            match self.0.read(buf) {
                Ok(len) => return Ok(len),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::error!("host read failed: {err}");
                    return Err(Error::SourceUnavailable);
                }
            }
        }
    }
}
