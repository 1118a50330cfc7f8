use tfs::{BitFlags, Error, OpenFlag, Params, StatKind, TinyFileSystem};

fn tfs() -> TinyFileSystem {
    TinyFileSystem::new(Params::default()).unwrap()
}

fn read_all(fs: &TinyFileSystem, path: &str) -> Vec<u8> {
    let fd = fs.open(path, OpenFlag::existing()).unwrap();
    let mut buf = vec![0; fs.block_size() + 1];
    let len = fs.read(fd, &mut buf).unwrap();
    fs.close(fd).unwrap();
    buf.truncate(len);
    buf
}

#[test]
fn write_close_reopen_read() {
    let fs = tfs();

    let h1 = fs.open("/a", OpenFlag::CREATE.into()).unwrap();
    assert_eq!(fs.write(h1, b"hello"), Ok(5));
    fs.close(h1).unwrap();

    let h2 = fs.open("/a", BitFlags::empty()).unwrap();
    let mut buf = [0; 10];
    assert_eq!(fs.read(h2, &mut buf), Ok(5));
    assert_eq!(&buf[..5], b"hello");
    assert_eq!(fs.read(h2, &mut buf), Ok(0));
    fs.close(h2).unwrap();
}

#[test]
fn create_twice_opens_same_inode() {
    let fs = tfs();

    let h1 = fs.open("/same", OpenFlag::CREATE.into()).unwrap();
    let h2 = fs.open("/same", OpenFlag::CREATE.into()).unwrap();
    assert_ne!(h1, h2);

    fs.write(h1, b"shared").unwrap();
    let mut buf = [0; 6];
    assert_eq!(fs.read(h2, &mut buf), Ok(6));
    assert_eq!(&buf, b"shared");

    assert_eq!(fs.read_dir().unwrap().len(), 1);
    assert_eq!(fs.usage().inodes, 2);
}

#[test]
fn handles_have_independent_cursors() {
    let fs = tfs();
    let writer = fs.open("/f", OpenFlag::CREATE.into()).unwrap();
    fs.write(writer, b"abcdef").unwrap();

    let r1 = fs.open("/f", OpenFlag::existing()).unwrap();
    let r2 = fs.open("/f", OpenFlag::existing()).unwrap();
    let mut buf = [0; 3];

    fs.read(r1, &mut buf).unwrap();
    assert_eq!(&buf, b"abc");
    fs.read(r1, &mut buf).unwrap();
    assert_eq!(&buf, b"def");
    fs.read(r2, &mut buf).unwrap();
    assert_eq!(&buf, b"abc");
}

#[test]
fn missing_file_without_create() {
    let fs = tfs();
    assert_eq!(fs.open("/nope", OpenFlag::existing()), Err(Error::NotFound));
    assert_eq!(fs.open("/nope", OpenFlag::TRUNC.into()), Err(Error::NotFound));
}

#[test]
fn malformed_paths() {
    let fs = tfs();
    for path in ["", "/", "a", "/a/b"] {
        assert_eq!(
            fs.open(path, OpenFlag::CREATE.into()),
            Err(Error::InvalidPath),
            "{path:?}"
        );
    }

    let long = format!("/{}", "n".repeat(28));
    assert_eq!(fs.open(&long, OpenFlag::CREATE.into()), Err(Error::NameTooLong));
    assert_eq!(fs.usage().inodes, 1);
}

#[test]
fn write_is_clamped_to_one_block() {
    let fs = tfs();
    let block_size = fs.block_size();
    let data: Vec<u8> = (0..block_size + 100).map(|i| i as u8).collect();

    let fd = fs.open("/big", OpenFlag::CREATE.into()).unwrap();
    assert_eq!(fs.write(fd, &data), Ok(block_size));
    assert_eq!(fs.write(fd, b"more"), Ok(0));
    fs.close(fd).unwrap();

    assert_eq!(read_all(&fs, "/big"), &data[..block_size]);
    assert_eq!(fs.stat("/big").unwrap().size, block_size as u64);
    assert_eq!(fs.usage().blocks, 2);
}

#[test]
fn write_near_block_end_is_truncated() {
    let fs = tfs();
    let block_size = fs.block_size();

    let fd = fs.open("/tail", OpenFlag::CREATE.into()).unwrap();
    fs.write(fd, &vec![1; block_size - 3]).unwrap();
    assert_eq!(fs.write(fd, b"abcdef"), Ok(3));
    fs.close(fd).unwrap();

    let content = read_all(&fs, "/tail");
    assert_eq!(content.len(), block_size);
    assert_eq!(&content[block_size - 3..], b"abc");
}

#[test]
fn append_and_truncate() {
    let fs = tfs();

    let fd = fs.open("/log", OpenFlag::CREATE.into()).unwrap();
    fs.write(fd, b"one").unwrap();
    fs.close(fd).unwrap();

    let fd = fs.open("/log", OpenFlag::APPEND.into()).unwrap();
    fs.write(fd, b"two").unwrap();
    fs.close(fd).unwrap();
    assert_eq!(read_all(&fs, "/log"), b"onetwo");

    let blocks = fs.usage().blocks;
    let fd = fs.open("/log", OpenFlag::TRUNC | OpenFlag::APPEND).unwrap();
    assert_eq!(fs.stat("/log").unwrap().size, 0);
    assert_eq!(fs.usage().blocks, blocks - 1);

    fs.write(fd, b"three").unwrap();
    fs.close(fd).unwrap();
    assert_eq!(read_all(&fs, "/log"), b"three");
}

#[test]
fn write_after_truncate_by_other_handle_zero_fills() {
    let fs = tfs();

    let old = fs.open("/f", OpenFlag::CREATE.into()).unwrap();
    fs.write(old, b"secret").unwrap();

    let trunc = fs.open("/f", OpenFlag::TRUNC.into()).unwrap();
    fs.close(trunc).unwrap();

    // 游标仍停在6
    assert_eq!(fs.write(old, b"!"), Ok(1));
    fs.close(old).unwrap();
    assert_eq!(read_all(&fs, "/f"), b"\0\0\0\0\0\0!");
}

#[test]
fn link_survives_unlink_of_first_name() {
    let fs = tfs();

    let fd = fs.open("/a", OpenFlag::CREATE.into()).unwrap();
    fs.write(fd, b"content").unwrap();
    fs.link("/a", "/b").unwrap();
    assert_eq!(fs.stat("/b").unwrap().links, 2);

    fs.unlink("/a").unwrap();
    assert_eq!(fs.open("/a", OpenFlag::existing()), Err(Error::NotFound));
    assert_eq!(read_all(&fs, "/b"), b"content");
    assert_eq!(fs.stat("/b").unwrap().links, 1);

    fs.close(fd).unwrap();
    fs.unlink("/b").unwrap();
    assert_eq!(fs.open("/b", OpenFlag::existing()), Err(Error::NotFound));
    assert_eq!(fs.usage().inodes, 1);
    // 只剩根目录的数据块
    assert_eq!(fs.usage().blocks, 1);
}

#[test]
fn link_errors() {
    let fs = tfs();
    assert_eq!(fs.link("/missing", "/l"), Err(Error::NotFound));

    let fd = fs.open("/f", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();
    fs.symlink("/f", "/s").unwrap();

    assert_eq!(fs.link("/s", "/l"), Err(Error::Unsupported));
    assert_eq!(fs.link("/f", "/s"), Err(Error::AlreadyExists));
    assert_eq!(fs.link("/f", "bad"), Err(Error::InvalidPath));
    assert_eq!(fs.stat("/f").unwrap().links, 1);
}

#[test]
fn symlink_resolves_on_open() {
    let fs = tfs();

    let fd = fs.open("/target", OpenFlag::CREATE.into()).unwrap();
    fs.write(fd, b"data").unwrap();
    fs.close(fd).unwrap();

    fs.symlink("/target", "/sym").unwrap();
    assert_eq!(fs.read_link("/sym").unwrap(), "/target");
    assert_eq!(fs.stat("/sym").unwrap().kind, StatKind::LNK);
    assert_eq!(fs.stat("/sym").unwrap().blocks, 0);
    assert_eq!(read_all(&fs, "/sym"), b"data");

    let fd = fs.open("/sym", OpenFlag::APPEND.into()).unwrap();
    fs.write(fd, b"+").unwrap();
    fs.close(fd).unwrap();
    assert_eq!(read_all(&fs, "/target"), b"data+");
}

#[test]
fn unlink_symlink_keeps_target() {
    let fs = tfs();

    let fd = fs.open("/target", OpenFlag::CREATE.into()).unwrap();
    fs.write(fd, b"kept").unwrap();
    fs.close(fd).unwrap();

    fs.symlink("/target", "/sym").unwrap();
    fs.unlink("/sym").unwrap();

    assert_eq!(fs.stat("/sym"), Err(Error::NotFound));
    assert_eq!(read_all(&fs, "/target"), b"kept");
    assert_eq!(fs.stat("/target").unwrap().links, 1);
}

#[test]
fn dangling_symlink() {
    let fs = tfs();
    fs.symlink("/nowhere", "/dangling").unwrap();

    assert_eq!(
        fs.open("/dangling", OpenFlag::existing()),
        Err(Error::NotFound)
    );

    // 带 CREATE 时创建的是链接指向的文件
    let fd = fs.open("/dangling", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();
    assert_eq!(fs.stat("/nowhere").unwrap().kind, StatKind::FILE);
}

#[test]
fn symlink_cycle_is_bounded() {
    let fs = tfs();
    fs.symlink("/pong", "/ping").unwrap();
    fs.symlink("/ping", "/pong").unwrap();
    fs.symlink("/self", "/self").unwrap();

    assert_eq!(
        fs.open("/ping", OpenFlag::existing()),
        Err(Error::SymlinkLoop)
    );
    assert_eq!(
        fs.open("/self", OpenFlag::CREATE.into()),
        Err(Error::SymlinkLoop)
    );
    assert_eq!(fs.usage().open_files, 0);
}

#[test]
fn unlink_errors() {
    let fs = tfs();
    assert_eq!(fs.unlink("/missing"), Err(Error::NotFound));
    assert_eq!(fs.unlink("missing"), Err(Error::InvalidPath));

    let fd = fs.open("/open", OpenFlag::CREATE.into()).unwrap();
    assert_eq!(fs.unlink("/open"), Err(Error::Busy));
    assert!(fs.stat("/open").is_ok());

    fs.close(fd).unwrap();
    assert_eq!(fs.unlink("/open"), Ok(()));
}

#[test]
fn unlink_one_of_two_names_while_open() {
    let fs = tfs();
    let fd = fs.open("/a", OpenFlag::CREATE.into()).unwrap();
    fs.link("/a", "/b").unwrap();

    assert_eq!(fs.unlink("/a"), Ok(()));
    assert_eq!(fs.unlink("/b"), Err(Error::Busy));

    fs.write(fd, b"still here").unwrap();
    fs.close(fd).unwrap();
    assert_eq!(read_all(&fs, "/b"), b"still here");
}

#[test]
fn close_invalid_handles() {
    let fs = tfs();
    let fd = fs.open("/f", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();

    assert_eq!(fs.close(fd), Err(Error::InvalidHandle));
    assert_eq!(fs.read(fd, &mut [0; 4]), Err(Error::InvalidHandle));
    assert_eq!(fs.write(fd, b"x"), Err(Error::InvalidHandle));
    assert_eq!(fs.close(usize::MAX.into()), Err(Error::InvalidHandle));
}

#[test]
fn inode_table_exhaustion() {
    let fs = TinyFileSystem::new(Params {
        max_inode_count: 2,
        ..Params::default()
    })
    .unwrap();
    assert_eq!(fs.params().max_inode_count, 2);
    assert_eq!(fs.usage().max_inodes, 2);

    let fd = fs.open("/first", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();
    assert_eq!(fs.open("/second", OpenFlag::CREATE.into()), Err(Error::NoSpace));
    assert_eq!(fs.symlink("/first", "/sym"), Err(Error::NoSpace));

    // 失败的创建不会留下目录项
    assert_eq!(fs.read_dir().unwrap().len(), 1);
}

#[test]
fn block_pool_exhaustion() {
    let fs = TinyFileSystem::new(Params {
        max_block_count: 2,
        ..Params::default()
    })
    .unwrap();

    let a = fs.open("/a", OpenFlag::CREATE.into()).unwrap();
    let b = fs.open("/b", OpenFlag::CREATE.into()).unwrap();
    assert_eq!(fs.write(a, b"fits"), Ok(4));
    assert_eq!(fs.write(b, b"no block left"), Err(Error::NoSpace));

    fs.close(a).unwrap();
    fs.unlink("/a").unwrap();
    assert_eq!(fs.write(b, b"now it fits"), Ok(11));
}

#[test]
fn directory_full_rolls_back_inode() {
    let fs = TinyFileSystem::new(Params {
        block_size: 64,
        ..Params::default()
    })
    .unwrap();

    // 64字节的块只放得下两个目录项
    for path in ["/a", "/b"] {
        let fd = fs.open(path, OpenFlag::CREATE.into()).unwrap();
        fs.close(fd).unwrap();
    }
    assert_eq!(fs.open("/c", OpenFlag::CREATE.into()), Err(Error::NoSpace));
    assert_eq!(fs.link("/a", "/c"), Err(Error::NoSpace));
    assert_eq!(fs.usage().inodes, 3);

    fs.unlink("/b").unwrap();
    let fd = fs.open("/c", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();
}

#[test]
fn open_file_table_exhaustion() {
    let fs = TinyFileSystem::new(Params {
        max_open_files_count: 1,
        ..Params::default()
    })
    .unwrap();

    let fd = fs.open("/a", OpenFlag::CREATE.into()).unwrap();
    assert_eq!(fs.open("/a", OpenFlag::existing()), Err(Error::TableFull));
    // 文件仍被创建
    assert_eq!(fs.open("/b", OpenFlag::CREATE.into()), Err(Error::TableFull));
    assert!(fs.stat("/b").is_ok());

    fs.close(fd).unwrap();
    assert!(fs.open("/b", OpenFlag::existing()).is_ok());
}

#[test]
fn invalid_params() {
    let bad = [
        Params {
            max_inode_count: 0,
            ..Params::default()
        },
        Params {
            max_block_count: 0,
            ..Params::default()
        },
        Params {
            max_open_files_count: 0,
            ..Params::default()
        },
        Params {
            block_size: 16,
            ..Params::default()
        },
    ];

    for params in bad {
        assert_eq!(
            TinyFileSystem::new(params).err(),
            Some(Error::InvalidParams),
            "{params:?}"
        );
    }
}

#[test]
fn read_dir_lists_kinds() {
    let fs = tfs();
    let fd = fs.open("/file", OpenFlag::CREATE.into()).unwrap();
    fs.close(fd).unwrap();
    fs.link("/file", "/hard").unwrap();
    fs.symlink("/file", "/soft").unwrap();

    let mut entries = fs.read_dir().unwrap();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    let summary: Vec<_> = entries
        .iter()
        .map(|dirent| (dirent.name.as_str(), dirent.kind))
        .collect();
    assert_eq!(
        summary,
        [
            ("file", StatKind::FILE),
            ("hard", StatKind::FILE),
            ("soft", StatKind::LNK),
        ]
    );
    assert_eq!(entries[0].inode, entries[1].inode);
    assert_eq!(fs.read_link("/file"), Err(Error::Unsupported));
}
