//! 文件系统驱动与挂载层之间的约定。

#![no_std]

extern crate alloc;

mod dirent;
mod error;
mod fs;
mod mode;
mod stat;

pub use self::{
    dirent::{DirEntry, DirEntryType},
    error::{Error, Result},
    fs::FileSystem,
    mode::Permission,
    stat::{FsStat, Stat},
};
