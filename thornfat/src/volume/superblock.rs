use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite, binrw};
use vfs::{Error, Result};

use crate::BlockId;
use crate::config::{MAGIC, MIN_BLOCKS};
use crate::volume::{DirEntry, Record};

/// 位于分区起始处
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superblock {
    /// 格式标识，恒为[`MAGIC`]
    pub magic: u32,
    /// 分区的总块数
    pub block_count: u64,
    /// 分配表占用的块数
    pub fat_blocks: u32,
    /// 一块的字节数
    pub block_size: u32,
    /// 根目录的起始块
    pub start_block: i32,
}

impl Superblock {
    /// 为`partition_len`字节的分区计算布局。
    pub fn new(partition_len: usize, block_size: usize) -> Result<Self> {
        Self::check_block_size(block_size)?;

        let block_count = partition_len / block_size;
        if block_count < MIN_BLOCKS || block_count > i32::MAX as usize {
            log::error!("{block_count} blocks cannot hold a filesystem");
            return Err(Error::InvalidArgument);
        }

        let fat_blocks = Self::table_size(block_count, block_size);
        // 根目录还需要一块
        if fat_blocks + 2 > block_count {
            log::error!("{fat_blocks} table blocks leave no room for the root directory");
            return Err(Error::InvalidArgument);
        }

        Ok(Self {
            magic: MAGIC,
            block_count: block_count as u64,
            fat_blocks: fat_blocks as u32,
            block_size: block_size as u32,
            start_block: fat_blocks as i32 + 1,
        })
    }

    /// 给`block_count`个块各存一个表项所需的最少块数
    pub fn table_size(block_count: usize, block_size: usize) -> usize {
        let per_block = block_size / mem::size_of::<i32>();
        if block_count < per_block {
            1
        } else {
            block_count.div_ceil(per_block)
        }
    }

    /// 挂载时检查读到的布局是否自洽
    pub fn validate(&self, partition_len: usize) -> Result<()> {
        let block_size = self.block_size();
        let block_count = self.block_count();
        if Self::check_block_size(block_size).is_err()
            || block_count < MIN_BLOCKS
            || block_count * block_size > partition_len
            || self.fat_blocks() != Self::table_size(block_count, block_size)
            || self.start_block != self.fat_blocks as i32 + 1
        {
            log::error!("inconsistent superblock: {self:?}");
            return Err(Error::Corrupted);
        }
        Ok(())
    }

    pub fn block_size(&self) -> usize {
        self.block_size as usize
    }

    pub fn block_count(&self) -> usize {
        self.block_count as usize
    }

    pub fn fat_blocks(&self) -> usize {
        self.fat_blocks as usize
    }

    pub fn root(&self) -> BlockId {
        BlockId::new(self.start_block as u32)
    }

    pub fn root_offset(&self) -> usize {
        self.root().offset(self.block_size())
    }

    /// 分配表紧跟超级块，从1号块开始
    pub fn table_offset(&self) -> usize {
        self.block_size()
    }

    fn check_block_size(block_size: usize) -> Result<()> {
        if block_size % DirEntry::SIZE != 0
            || block_size < 2 * DirEntry::SIZE
            || block_size < Self::SIZE
        {
            log::error!("unusable block size {block_size}");
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

impl Record for Superblock {
    const SIZE: usize = 4 + 8 + 4 + 4 + 4;

    fn decode(raw: &[u8]) -> Result<Self> {
        Self::read_le(&mut Cursor::new(raw)).map_err(|_| Error::Corrupted)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut raw = vec![0; Self::SIZE];
        self.write_le(&mut Cursor::new(raw.as_mut_slice()))
            .map_err(|_| Error::Corrupted)?;
        Ok(raw)
    }
}
