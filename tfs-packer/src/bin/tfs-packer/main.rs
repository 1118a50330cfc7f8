mod cli;

use std::fs::File;
use std::io;

use clap::Parser;
use cli::Cli;
use tfs::TinyFileSystem;
use tfs_packer::HostFile;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let fs = TinyFileSystem::new(cli.params()).map_err(io::Error::other)?;

    let mut failed = 0;
    for host_path in &cli.files {
        let Some(name) = host_path.file_name().and_then(|name| name.to_str()) else {
            log::error!("{host_path:?} has no usable file name");
            failed += 1;
            continue;
        };
        let dest = format!("/{name}");

        let copied = File::open(host_path)
            .map_err(|err| {
                log::error!("cannot open {host_path:?}: {err}");
                tfs::Error::SourceUnavailable
            })
            .and_then(|file| fs.copy_from_external(&mut HostFile(file), &dest));

        match copied {
            Ok(()) => log::info!("{host_path:?} -> {dest:?}"),
            Err(err) => {
                log::error!("{host_path:?} -> {dest:?}: {err}");
                failed += 1;
            }
        }
    }

    let mut entries = fs.read_dir().map_err(io::Error::other)?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    for dirent in entries {
        let stat = fs
            .stat(&format!("/{}", dirent.name))
            .map_err(io::Error::other)?;
        println!(
            "{} {} {:?} {} {}",
            dirent.name, stat.inode, stat.kind, stat.size, stat.links
        );
    }
    log::debug!("{:?}", fs.usage());

    if failed > 0 {
        return Err(io::Error::other(format!(
            "{failed} of {} files failed to copy",
            cli.files.len()
        )));
    }

    Ok(())
}
