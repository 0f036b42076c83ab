mod common;

use thornfat::{MountOptions, ThornFat};
use vfs::{DirEntryType, Error, FileSystem};

use self::common::*;

const BS: usize = 640;

#[test]
fn round_trip() {
    let mut fs = format(64, BS);
    for len in [0, 1, BS - 1, BS, BS + 1, 2000, 3 * BS + 17] {
        let path = format!("/f{len}");
        fs.create(&path, 0o644, 0, 0).unwrap();
        let data = pattern(len);
        assert_eq!(len, fs.write(&path, &data, 0).unwrap());
        assert_eq!(len, fs.getsize(&path).unwrap());
        assert_eq!(data, read_all(&mut fs, &path), "length {len}");
    }
}

#[test]
fn partial_io() {
    let mut fs = format(64, BS);
    fs.create("/f", 0o644, 0, 0).unwrap();
    fs.write("/f", &pattern(1500), 0).unwrap();

    // 跨块覆盖写
    fs.write("/f", b"hello", BS - 2).unwrap();
    let data = read_all(&mut fs, "/f");
    assert_eq!(1500, data.len());
    assert_eq!(b"hello", &data[BS - 2..BS + 3]);
    assert_eq!(pattern(1500)[..BS - 2], data[..BS - 2]);

    // 读取不会越过文件末尾
    let mut buf = [0xff; 64];
    assert_eq!(20, fs.read("/f", &mut buf, 1480).unwrap());
    assert_eq!(0, fs.read("/f", &mut buf, 1500).unwrap());
    assert_eq!(0, fs.read("/f", &mut buf, 9999).unwrap());
}

#[test]
fn write_past_end() {
    let mut fs = format(64, BS);
    fs.create("/sparse", 0o644, 0, 0).unwrap();
    fs.write("/sparse", b"abc", 1000).unwrap();

    let data = read_all(&mut fs, "/sparse");
    assert_eq!(1003, data.len());
    assert!(data[..1000].iter().all(|&b| b == 0));
    assert_eq!(b"abc", &data[1000..]);

    // 空写入什么都不改
    assert_eq!(0, fs.write("/sparse", b"", 5000).unwrap());
    assert_eq!(1003, fs.getsize("/sparse").unwrap());
}

#[test]
fn idempotent_truncate() {
    let mut fs = format(64, BS);
    fs.create("/f", 0o644, 0, 0).unwrap();
    fs.write("/f", &pattern(2000), 0).unwrap();
    let blocks = fs.getattr("/f").unwrap().blocks;
    assert_eq!(4, blocks);

    fs.truncate("/f", 2000).unwrap();
    assert_eq!(blocks, fs.getattr("/f").unwrap().blocks);
    assert_eq!(pattern(2000), read_all(&mut fs, "/f"));
}

#[test]
fn shrink_grow_symmetry() {
    let mut fs = format(64, BS);
    fs.create("/f", 0o644, 0, 0).unwrap();
    let data = pattern(2000);
    fs.write("/f", &data, 0).unwrap();

    for cut in [1950, 1900, 700, BS, 1, 0] {
        fs.truncate("/f", cut).unwrap();
        assert_eq!(cut.div_ceil(BS).max(1) as u64, fs.getattr("/f").unwrap().blocks);
        fs.truncate("/f", 2000).unwrap();

        let back = read_all(&mut fs, "/f");
        assert_eq!(data[..cut], back[..cut], "cut at {cut}");
        assert!(back[cut..].iter().all(|&b| b == 0), "cut at {cut}");

        fs.write("/f", &data, 0).unwrap();
    }
}

#[test]
fn ftruncate_by_path() {
    let mut fs = format(64, BS);
    fs.create("/f", 0o644, 0, 0).unwrap();
    fs.ftruncate("/f", 3 * BS).unwrap();
    assert_eq!(3 * BS, fs.getsize("/f").unwrap());
    assert_eq!(3, fs.getattr("/f").unwrap().blocks);
}

#[test]
fn space_accounting() {
    let mut fs = format(64, BS);
    fs.mkdir("/d", 0o755, 0, 0).unwrap();
    let free = fs.free_blocks().unwrap();

    fs.create("/d/x", 0o644, 0, 0).unwrap();
    fs.write("/d/x", &pattern(1500), 0).unwrap();
    assert_eq!(free - 3, fs.free_blocks().unwrap());
    fs.unlink("/d/x").unwrap();

    assert_eq!(free, fs.free_blocks().unwrap());
}

#[test]
fn directories_are_not_files() {
    let mut fs = format(64, BS);
    fs.mkdir("/d", 0o755, 0, 0).unwrap();
    let mut buf = [0; 8];
    assert_eq!(Err(Error::IsADirectory), fs.read("/d", &mut buf, 0));
    assert_eq!(Err(Error::IsADirectory), fs.write("/d", b"x", 0));
    assert_eq!(Err(Error::IsADirectory), fs.truncate("/d", 0));
    assert_eq!(Err(Error::IsADirectory), fs.unlink("/d"));
    assert_eq!(Err(Error::NotFound), fs.read("/missing", &mut buf, 0));
}

#[test]
fn attributes() {
    fn clock() -> i64 {
        1_700_000_000
    }

    let part = partition(64, BS);
    let options = MountOptions {
        clock,
        ..MountOptions::with_label("attr")
    };
    let mut fs = ThornFat::make(part, BS, options).unwrap();
    fs.create("/f", 0o640, 7, 8).unwrap();
    fs.write("/f", b"data", 0).unwrap();

    let stat = fs.getattr("/f").unwrap();
    assert_eq!(DirEntryType::Regular, stat.kind);
    assert_eq!(4, stat.size);
    assert_eq!(BS as u64, stat.block_size);
    assert_eq!(1, stat.blocks);
    assert_eq!(0o640, stat.mode);
    assert_eq!((7, 8), (stat.uid, stat.gid));
    assert_eq!(1_700_000_000, stat.created);
    assert!(stat.permissions().contains(vfs::Permission::OwnerRead | vfs::Permission::GroupRead));
    assert!(!stat.permissions().contains(vfs::Permission::OtherRead));

    fs.utimens("/f", 42).unwrap();
    let stat = fs.getattr("/f").unwrap();
    assert_eq!((42, 42), (stat.accessed, stat.modified));
    assert_eq!(1_700_000_000, stat.created);

    assert!(fs.isfile("/f").unwrap());
    assert!(!fs.isdir("/f").unwrap());
    assert!(fs.isdir("/").unwrap());
    assert!(fs.exists("/f").unwrap());
    assert!(!fs.exists("/g").unwrap());
    assert_eq!(Err(Error::NotFound), fs.isfile("/g"));
}

#[test]
fn no_descriptors() {
    let mut fs = format(64, BS);
    fs.create("/f", 0o644, 0, 0).unwrap();
    assert_eq!(Err(Error::Unsupported), fs.open("/f"));
    assert_eq!(Ok(()), fs.release("/f"));
    assert_eq!(-38, Error::Unsupported.errno());
}
