use crate::layout::DirEntry;
use crate::Error;

/// 返回根目录下的文件名。
///
/// 只接受`/name`：必须以`/`开头，名字非空且不再含`/`。
pub fn root_relative(path: &str) -> Result<&str, Error> {
    let name = path.strip_prefix('/').ok_or(Error::InvalidPath)?;

    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\0') {
        return Err(Error::InvalidPath);
    }
    if name.len() > DirEntry::NAME_MAX_LEN {
        return Err(Error::NameTooLong);
    }

    Ok(name)
}
