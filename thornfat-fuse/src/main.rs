mod block_file;
mod cli;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use block_dev::Partition;
use clap::Parser;
use enumflags2::BitFlags;
use thornfat::{MountOptions, ThornFat};
use typed_bytesize::ByteSizeIec;
use vfs::{DirEntryType, FileSystem, Permission};

pub use self::{
    block_file::BlockFile,
    cli::{Cli, Command},
};

/// 一次拷贝的字节数
const CHUNK: usize = 64 * 1024;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Format {
            size_mib,
            block_size,
        } => {
            let disk_size = ByteSizeIec::mib(size_mib).0;
            let fd = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&cli.image)?;
            fd.set_len(disk_size)?;

            let dev: Arc<dyn Partition> = Arc::new(BlockFile::new(fd)?);
            let fs = ThornFat::make(dev, block_size, options()).map_err(fs_error)?;
            println!(
                "{}: {} blocks of {} bytes",
                cli.image.display(),
                fs.block_count(),
                fs.block_size()
            );
        }
        Command::Pack { source, target } => {
            let mut fs = mount(&cli.image)?;
            pack(&mut fs, &source, &target)?;
        }
        Command::Ls { path } => {
            let mut fs = mount(&cli.image)?;
            for entry in fs.ls(&path).map_err(fs_error)? {
                let full = format!("{}/{}", path.trim_end_matches('/'), entry.name);
                let stat = fs.getattr(&full).map_err(fs_error)?;
                let kind = match entry.ty {
                    DirEntryType::Directory => 'd',
                    DirEntryType::Regular => '-',
                };
                println!(
                    "{kind}{:>6o} {:>5} {:>5} {:>10} {}",
                    stat.permissions().bits(),
                    stat.uid,
                    stat.gid,
                    stat.size,
                    entry.name
                );
            }
        }
        Command::Cat { path } => {
            let mut fs = mount(&cli.image)?;
            let mut stdout = io::stdout().lock();
            let mut buf = vec![0; CHUNK];
            let mut offset = 0;
            loop {
                let n = fs.read(&path, &mut buf, offset).map_err(fs_error)?;
                if n == 0 {
                    break;
                }
                stdout.write_all(&buf[..n])?;
                offset += n;
            }
        }
        Command::Df => {
            let mut fs = mount(&cli.image)?;
            let stat = fs.statfs().map_err(fs_error)?;
            println!(
                "magic={:#x} block_size={} total={} free={}",
                stat.magic, stat.block_size, stat.total_blocks, stat.free_blocks
            );
        }
    }

    Ok(())
}

fn options() -> MountOptions {
    MountOptions {
        clock: unix_time,
        ..MountOptions::with_label("thornfat-fuse")
    }
}

fn unix_time() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |t| t.as_secs() as i64)
}

fn fs_error(err: vfs::Error) -> io::Error {
    io::Error::other(err.to_string())
}

fn mount(image: &Path) -> io::Result<ThornFat> {
    let fd = OpenOptions::new().read(true).write(true).open(image)?;
    let dev: Arc<dyn Partition> = Arc::new(BlockFile::new(fd)?);
    ThornFat::mount(dev, options()).map_err(fs_error)
}

/// 把宿主机目录`source`的内容递归拷进镜像中的`target`
fn pack(fs: &mut ThornFat, source: &Path, target: &str) -> io::Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("skipping non-UTF-8 name {name:?}");
            continue;
        };
        let path = format!("{}/{name}", target.trim_end_matches('/'));
        let meta = entry.metadata()?;
        let mode = BitFlags::<Permission>::from_bits_truncate(meta.permissions().mode()).bits();

        if meta.is_dir() {
            log::info!("mkdir {path}");
            fs.mkdir(&path, mode, 0, 0).map_err(fs_error)?;
            pack(fs, &entry.path(), &path)?;
        } else if meta.is_file() {
            log::info!("copy {path} ({} bytes)", meta.len());
            let data = fs::read(entry.path())?;
            fs.create(&path, mode, 0, 0).map_err(fs_error)?;
            fs.write(&path, &data, 0).map_err(fs_error)?;
        }
    }
    Ok(())
}
