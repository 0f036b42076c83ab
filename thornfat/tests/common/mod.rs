#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use block_dev::MemPartition;
use thornfat::{MountOptions, ThornFat};
use vfs::FileSystem;

pub fn partition(blocks: usize, block_size: usize) -> Arc<MemPartition> {
    Arc::new(MemPartition::new(blocks * block_size))
}

pub fn format(blocks: usize, block_size: usize) -> ThornFat {
    ThornFat::make(
        partition(blocks, block_size),
        block_size,
        MountOptions::with_label("test"),
    )
    .unwrap()
}

pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

pub fn read_all(fs: &mut ThornFat, path: &str) -> Vec<u8> {
    let len = fs.getsize(path).unwrap();
    let mut buf = vec![0; len];
    assert_eq!(len, fs.read(path, &mut buf, 0).unwrap());
    buf
}

pub fn names(fs: &mut ThornFat, path: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    fs.readdir(path, &mut |name, _| {
        names.insert(name.to_owned());
    })
    .unwrap();
    names
}

pub fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|&name| name.to_owned()).collect()
}
