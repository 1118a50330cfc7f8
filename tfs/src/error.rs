use derive_more::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[display(fmt = "path must be `/` followed by a single name")]
    InvalidPath,
    #[display(fmt = "file name too long")]
    NameTooLong,
    #[display(fmt = "no such file")]
    NotFound,
    #[display(fmt = "file already exists")]
    AlreadyExists,
    #[display(fmt = "no space left")]
    NoSpace,
    #[display(fmt = "too many open files")]
    TableFull,
    #[display(fmt = "invalid file handle")]
    InvalidHandle,
    #[display(fmt = "data block out of range")]
    InvalidBlock,
    #[display(fmt = "operation not supported")]
    Unsupported,
    #[display(fmt = "too many levels of symbolic links")]
    SymlinkLoop,
    #[display(fmt = "file is still open")]
    Busy,
    #[display(fmt = "external source unavailable")]
    SourceUnavailable,
    #[display(fmt = "destination truncated during copy")]
    PartialCopy,
    #[display(fmt = "invalid filesystem parameters")]
    InvalidParams,
}

impl core::error::Error for Error {}
