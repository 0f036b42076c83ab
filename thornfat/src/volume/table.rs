//! 分配表：每个块对应一个`i32`，把块串成单向链表。

use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use vfs::{Error, Result};

use crate::disk::Disk;
use crate::volume::Superblock;
use crate::{BlockId, FatEntry};

const ENTRY_SIZE: usize = mem::size_of::<i32>();

#[derive(Debug)]
pub struct AllocTable {
    /// 0号表项的字节偏移
    offset: usize,
    block_size: usize,
    block_count: usize,
    fat_blocks: usize,
    /// 空闲块计数，第一次完整扫描后缓存
    free: Option<usize>,
}

impl AllocTable {
    pub fn new(sb: &Superblock) -> Self {
        Self {
            offset: sb.table_offset(),
            block_size: sb.block_size(),
            block_count: sb.block_count(),
            fat_blocks: sb.fat_blocks(),
            free: None,
        }
    }

    /// 清空整张表，标出超级块与表自身占用的块，并让根目录独占一块。
    pub fn format(&mut self, disk: &Disk, root: BlockId) -> Result<()> {
        disk.zero(self.offset, self.fat_blocks * self.block_size)?;
        for index in 0..=self.fat_blocks {
            disk.write_i32(self.entry_offset(index), FatEntry::UNUSABLE)?;
        }
        self.set(disk, root, FatEntry::Final)?;
        self.free = Some(self.block_count - self.fat_blocks - 2);
        Ok(())
    }

    pub fn get(&self, disk: &Disk, id: BlockId) -> Result<FatEntry> {
        self.check(id)?;
        disk.read_i32(self.entry_offset(id.get() as usize))
            .map(FatEntry::from)
    }

    /// 直接改写表项，不维护空闲计数。
    pub fn set(&self, disk: &Disk, id: BlockId, entry: FatEntry) -> Result<()> {
        self.check(id)?;
        disk.write_i32(self.entry_offset(id.get() as usize), entry.into())
    }

    /// 获取下一块。
    /// `Ok(None)`表示`id`为链表上最后一块，链表断在空闲或不可用的项上则报错。
    pub fn next(&self, disk: &Disk, id: BlockId) -> Result<Option<BlockId>> {
        match self.get(disk, id)? {
            FatEntry::Final => Ok(None),
            FatEntry::Next(next) => Ok(Some(next)),
            _ => Err(Error::Corrupted),
        }
    }

    /// 链表上第`n`块（从0数起）
    pub fn nth(&self, disk: &Disk, start: BlockId, n: usize) -> Result<BlockId> {
        let mut id = start;
        for _ in 0..n {
            id = self.next(disk, id)?.ok_or(Error::Corrupted)?;
        }
        Ok(id)
    }

    /// 链表上的前`n`块
    pub fn chain(&self, disk: &Disk, start: BlockId, n: usize) -> Result<Vec<BlockId>> {
        let mut blocks = Vec::with_capacity(n);
        let mut id = start;
        for i in 0..n {
            blocks.push(id);
            if i + 1 < n {
                id = self.next(disk, id)?.ok_or(Error::Corrupted)?;
            }
        }
        Ok(blocks)
    }

    /// 让`from`指向`to`
    pub fn link(&self, disk: &Disk, from: BlockId, to: BlockId) -> Result<()> {
        self.set(disk, from, FatEntry::Next(to))
    }

    /// 认领一个空闲块并标记为链表末尾
    pub fn claim(&mut self, disk: &Disk) -> Result<BlockId> {
        let id = self.find_free(disk)?.ok_or(Error::NoSpace)?;
        self.set(disk, id, FatEntry::Final)?;
        if let Some(free) = self.free.as_mut() {
            *free = free.saturating_sub(1);
        }
        Ok(id)
    }

    pub fn release(&mut self, disk: &Disk, id: BlockId) -> Result<()> {
        self.set(disk, id, FatEntry::Free)?;
        if let Some(free) = self.free.as_mut() {
            *free += 1;
        }
        Ok(())
    }

    /// 归还整个链表，返回归还的块数。
    pub fn free_chain(&mut self, disk: &Disk, start: BlockId) -> Result<usize> {
        let mut id = start;
        let mut freed = 0;
        for _ in 0..self.block_count {
            let entry = self.get(disk, id)?;
            self.release(disk, id)?;
            freed += 1;
            match entry {
                FatEntry::Next(next) => id = next,
                FatEntry::Final => return Ok(freed),
                // 断在空闲或不可用的项上，能归还的都已归还
                _ => return Ok(freed),
            }
        }
        Err(Error::Corrupted)
    }

    /// 第一个空闲块
    pub fn find_free(&self, disk: &Disk) -> Result<Option<BlockId>> {
        let mut found = None;
        self.scan(disk, |id, entry| {
            if entry == FatEntry::Free {
                found = Some(id);
                false
            } else {
                true
            }
        })?;
        Ok(found)
    }

    pub fn count_free(&mut self, disk: &Disk) -> Result<usize> {
        if let Some(free) = self.free {
            return Ok(free);
        }

        let mut free = 0;
        self.scan(disk, |_, entry| {
            if entry == FatEntry::Free {
                free += 1;
            }
            true
        })?;
        self.free = Some(free);
        Ok(free)
    }

    pub fn has_free(&mut self, disk: &Disk, n: usize) -> Result<bool> {
        Ok(self.count_free(disk)? >= n)
    }
}

impl AllocTable {
    /// 一块能容纳多少个表项
    fn block_entries(&self) -> usize {
        self.block_size / ENTRY_SIZE
    }

    fn entry_offset(&self, index: usize) -> usize {
        self.offset + index * ENTRY_SIZE
    }

    fn check(&self, id: BlockId) -> Result<()> {
        assert!(id.get() >= 1, "block index {id} is reserved");
        if id.get() as usize >= self.block_count {
            return Err(Error::Corrupted);
        }
        Ok(())
    }

    /// 按块读出表项逐个访问，`visit`返回`false`时停止。
    fn scan(&self, disk: &Disk, mut visit: impl FnMut(BlockId, FatEntry) -> bool) -> Result<()> {
        let per_block = self.block_entries();
        let mut buf = vec![0u8; self.block_size];
        for i in 0..self.fat_blocks {
            disk.read(self.offset + i * self.block_size, &mut buf)?;
            for (j, raw) in buf.chunks_exact(ENTRY_SIZE).enumerate() {
                let index = i * per_block + j;
                if index >= self.block_count {
                    return Ok(());
                }
                let raw = i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                if !visit(BlockId::new(index as u32), FatEntry::from(raw)) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
