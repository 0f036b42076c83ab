//! 卷的布局
//!
//! 超级块 | 分配表 | 根目录 | 数据块
//!
//! 超级块位于0号块；分配表从1号块开始，共`fat_blocks`块，
//! 每个数据块对应一个`i32`表项；根目录从`fat_blocks + 1`号块开始。
//! 所有整数均为小端序。

mod record;
mod superblock;
mod table;

use alloc::vec::Vec;

use vfs::Result;

pub(crate) use self::table::AllocTable;
pub use self::{
    record::{DirEntry, EntryKind, NAME_CAP, Times},
    superblock::Superblock,
};

/// 磁盘上定长的二进制结构
pub trait Record: Sized {
    /// 编码后的字节数
    const SIZE: usize;

    fn decode(raw: &[u8]) -> Result<Self>;

    fn encode(&self) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume() {
        assert_eq!(24, Superblock::SIZE);
        assert_eq!(320, DirEntry::SIZE);
        assert_eq!(0, DirEntry::SIZE % 64);
    }
}
