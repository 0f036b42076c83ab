//! 块编号与分配表项

use derive_more::{Display, From, Into};

/// 数据块编号。0号块是超级块，永远不会出现在链表中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// 块在分区内的字节偏移
    pub const fn offset(self, block_size: usize) -> usize {
        self.0 as usize * block_size
    }

    /// 目录项里的起始块编号，非正数表示没有链表。
    pub const fn from_start(raw: i32) -> Option<Self> {
        if raw > 0 { Some(Self(raw as u32)) } else { None }
    }

    pub const fn as_start(self) -> i32 {
        self.0 as i32
    }
}

/// 分配表中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    Free,
    /// 链表的最后一块
    Final,
    /// 超级块与分配表自身占用的块
    Unusable,
    Next(BlockId),
    /// 无法识别的负数
    Bad(i32),
}

impl FatEntry {
    pub const FREE: i32 = 0;
    pub const UNUSABLE: i32 = -1;
    pub const FINAL: i32 = -2;
}

impl From<i32> for FatEntry {
    fn from(raw: i32) -> Self {
        match raw {
            Self::FREE => Self::Free,
            Self::FINAL => Self::Final,
            Self::UNUSABLE => Self::Unusable,
            next if next > 0 => Self::Next(BlockId(next as u32)),
            bad => Self::Bad(bad),
        }
    }
}

impl From<FatEntry> for i32 {
    fn from(entry: FatEntry) -> Self {
        match entry {
            FatEntry::Free => FatEntry::FREE,
            FatEntry::Final => FatEntry::FINAL,
            FatEntry::Unusable => FatEntry::UNUSABLE,
            FatEntry::Next(id) => id.as_start(),
            FatEntry::Bad(raw) => raw,
        }
    }
}
