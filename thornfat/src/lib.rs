//! ThornFAT：以分配表串联数据块、以定长二进制目录项描述文件的小型文件系统。
//!
//! 驱动只依赖一个[`Partition`](block_dev::Partition)，
//! 对外以[`vfs::FileSystem`]的形式提供服务。

#![no_std]

extern crate alloc;

#[macro_use]
mod logging;

mod allocator;
mod block;
mod config;
mod control;
mod disk;
mod lookup;
mod ops;
pub mod path;
mod resize;
pub mod volume;

pub use self::{
    block::{BlockId, FatEntry},
    config::{ChainRepair, MAGIC, MIN_BLOCKS, MountOptions, NAME_MAX},
    control::ThornFat,
};
