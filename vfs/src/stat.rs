use enumflags2::BitFlags;

use crate::{DirEntryType, Permission};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub kind: DirEntryType,
    /// Inode number
    pub inode: u64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size
    pub size: u64,
    /// Optimal I/O block size
    pub block_size: u64,
    /// Occupying blocks
    pub blocks: u64,
    pub created: i64,
    pub modified: i64,
    pub accessed: i64,
}

impl Stat {
    pub fn permissions(&self) -> BitFlags<Permission> {
        BitFlags::from_bits_truncate(self.mode)
    }
}

/// 整个文件系统的统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsStat {
    /// Identifies the type of the filesystem
    pub magic: u32,
    /// Maximum filename length
    pub name_max: usize,
    pub block_size: usize,
    pub total_blocks: usize,
    pub free_blocks: usize,
    /// Free blocks available to unprivileged users
    pub available_blocks: usize,
}
