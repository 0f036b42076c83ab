mod common;

use thornfat::NAME_MAX;
use vfs::{DirEntryType, Error, FileSystem};

use self::common::*;

const BS: usize = 640;

#[test]
fn listing() {
    let mut fs = format(64, BS);
    fs.mkdir("/d", 0o755, 0, 0).unwrap();
    for name in ["a", "b", "c"] {
        fs.create(&format!("/d/{name}"), 0o644, 0, 0).unwrap();
    }
    fs.unlink("/d/b").unwrap();

    assert_eq!(set(&[".", "..", "a", "c"]), names(&mut fs, "/d"));
    assert_eq!(set(&[".", "..", "d"]), names(&mut fs, "/"));
}

#[test]
fn ls() {
    let mut fs = format(64, BS);
    fs.mkdir("/usr", 0o755, 0, 0).unwrap();
    fs.mkdir("/usr/bin", 0o755, 0, 0).unwrap();
    fs.create("/usr/bin/sh", 0o755, 0, 0).unwrap();

    let usr = fs.getattr("/usr").unwrap().inode;
    let bin = fs.getattr("/usr/bin").unwrap().inode;
    let entries = fs.ls("/usr/bin").unwrap();
    assert_eq!(3, entries.len());

    let find = |name: &str| entries.iter().find(|e| e.name == name).unwrap();
    assert_eq!(bin, find(".").inode);
    assert_eq!(usr, find("..").inode);
    assert_eq!(DirEntryType::Directory, find("..").ty);
    assert_eq!(DirEntryType::Regular, find("sh").ty);

    assert_eq!(Err(Error::NotADirectory), fs.ls("/usr/bin/sh"));
}

#[test]
fn path_forms() {
    let mut fs = format(64, BS);
    fs.mkdir("a", 0o755, 0, 0).unwrap();
    fs.create("/a//b/", 0o644, 0, 0).unwrap();
    assert!(fs.exists("/a/./b").unwrap());
    assert!(fs.exists("/a/../a/b").unwrap());
    assert!(fs.exists("/../a/b").unwrap());
    assert_eq!(Err(Error::AlreadyExists), fs.create("/a/b", 0o644, 0, 0));
    assert_eq!(Err(Error::AlreadyExists), fs.mkdir("/a", 0o755, 0, 0));
    assert_eq!(Err(Error::AlreadyExists), fs.mkdir("/", 0o755, 0, 0));
}

#[test]
fn rmdir() {
    let mut fs = format(64, BS);
    let free = fs.free_blocks().unwrap();
    fs.mkdir("/d", 0o755, 0, 0).unwrap();
    fs.mkdir("/d/e", 0o755, 0, 0).unwrap();
    fs.create("/d/f", 0o644, 0, 0).unwrap();

    assert_eq!(Err(Error::DirectoryNotEmpty), fs.rmdir("/d"));
    assert_eq!(Err(Error::NotADirectory), fs.rmdir("/d/f"));
    assert_eq!(Err(Error::InvalidArgument), fs.rmdir("/"));
    assert_eq!(Err(Error::NotFound), fs.rmdir("/nope"));

    fs.unlink("/d/f").unwrap();
    fs.rmdir("/d/e").unwrap();
    assert!(!fs.exists("/d/e").unwrap());
    fs.rmdir("/d").unwrap();
    assert!(!fs.exists("/d").unwrap());
    assert_eq!(set(&[".", ".."]), names(&mut fs, "/"));

    // 根目录为容纳`d`多接的一块不会还回来
    assert_eq!(free - 1, fs.free_blocks().unwrap());
}

#[test]
fn through_a_file() {
    let mut fs = format(64, BS);
    fs.create("/file", 0o644, 0, 0).unwrap();
    assert_eq!(Err(Error::NotADirectory), fs.getattr("/file/sub").map(|_| ()));
    assert_eq!(Err(Error::NotADirectory), fs.exists("/file/sub"));
    assert_eq!(Err(Error::NotADirectory), fs.create("/file/sub", 0o644, 0, 0));
    assert_eq!(Err(Error::NotADirectory), fs.readdir("/file", &mut |_, _| {}));
    assert_eq!(Err(Error::NotFound), fs.create("/missing/sub", 0o644, 0, 0));
}

#[test]
fn name_too_long() {
    let mut fs = format(64, BS);
    let free = fs.free_blocks().unwrap();
    let long = format!("/{}", "n".repeat(NAME_MAX + 1));
    assert_eq!(Err(Error::NameTooLong), fs.create(&long, 0o644, 0, 0));
    assert_eq!(Err(Error::NameTooLong), fs.mkdir(&long, 0o755, 0, 0));
    assert_eq!(free, fs.free_blocks().unwrap());

    let longest = format!("/{}", "n".repeat(NAME_MAX));
    fs.create(&longest, 0o644, 0, 0).unwrap();
    assert!(fs.isfile(&longest).unwrap());
}

#[test]
fn rename_overwrite() {
    let mut fs = format(64, BS);
    fs.create("/x", 0o644, 0, 0).unwrap();
    fs.write("/x", &pattern(900), 0).unwrap();
    fs.create("/y", 0o644, 0, 0).unwrap();
    fs.write("/y", b"old", 0).unwrap();
    let free = fs.free_blocks().unwrap();

    fs.rename("/x", "/y").unwrap();
    assert_eq!(set(&[".", "..", "y"]), names(&mut fs, "/"));
    assert_eq!(pattern(900), read_all(&mut fs, "/y"));
    // `y`原先的一块被归还
    assert_eq!(free + 1, fs.free_blocks().unwrap());
}

#[test]
fn rename_move() {
    let mut fs = format(64, BS);
    fs.create("/x", 0o644, 0, 0).unwrap();
    fs.write("/x", b"payload", 0).unwrap();
    fs.mkdir("/d", 0o755, 0, 0).unwrap();

    fs.rename("/x", "/d/z").unwrap();
    assert!(!fs.exists("/x").unwrap());
    assert_eq!(b"payload".to_vec(), read_all(&mut fs, "/d/z"));

    fs.rename("/d/z", "/d/z").unwrap();
    assert_eq!(set(&[".", "..", "z"]), names(&mut fs, "/d"));
    assert_eq!(Err(Error::NotFound), fs.rename("/x", "/w"));
}

#[test]
fn rename_directory() {
    let mut fs = format(64, BS);
    fs.mkdir("/a", 0o755, 0, 0).unwrap();
    fs.create("/a/f", 0o644, 0, 0).unwrap();
    fs.write("/a/f", b"hi", 0).unwrap();
    fs.mkdir("/b", 0o755, 0, 0).unwrap();

    assert_eq!(Err(Error::InvalidArgument), fs.rename("/a", "/a/inner"));
    assert_eq!(Err(Error::IsADirectory), fs.rename("/a", "/b"));
    assert_eq!(Err(Error::InvalidArgument), fs.rename("/", "/c"));

    fs.rename("/a", "/b/a").unwrap();
    assert!(!fs.exists("/a").unwrap());
    assert_eq!(b"hi".to_vec(), read_all(&mut fs, "/b/a/f"));

    // 搬家后的`..`指向新的父目录
    let b = fs.getattr("/b").unwrap().inode;
    let entries = fs.ls("/b/a").unwrap();
    let dotdot = entries.iter().find(|e| e.name == "..").unwrap();
    assert_eq!(b, dotdot.inode);
}
