use core::cmp::Ordering;

use vfs::{Error, Result};

use crate::control::{Slot, ThornFat};
use crate::{BlockId, FatEntry};

impl ThornFat {
    /// 让目录项的块链表恰好容纳`new_len`字节，最后写回目录项。
    ///
    /// 被截掉的字节清零，新认领的块本身也是零，因此长度之外读到的总是零。
    /// 需要更多块时先确认空间足够，否则不做任何改动。
    pub(crate) fn resize(&mut self, slot: &mut Slot, new_len: usize) -> Result<()> {
        let old_len = slot.entry.length as usize;
        if old_len == new_len {
            return Ok(());
        }

        let head = slot.entry.start().ok_or(Error::InvalidArgument)?;
        let old_blocks = self.chain_len(head)?;
        let new_blocks = self.blocks_for(new_len);
        fs_trace!(
            self,
            "resize {:?}: {old_len} -> {new_len} bytes, {old_blocks} -> {new_blocks} blocks",
            slot.entry.name()
        );

        match new_blocks.cmp(&old_blocks) {
            Ordering::Equal => {
                if new_len < old_len {
                    self.zero_tail(head, new_len, old_len)?;
                }
            }
            Ordering::Less => {
                let blocks = self.table.chain(&self.disk, head, old_blocks)?;
                self.zero_tail(head, new_len, old_len)?;
                self.table.set(&self.disk, blocks[new_blocks - 1], FatEntry::Final)?;
                for &id in &blocks[new_blocks..] {
                    self.table.release(&self.disk, id)?;
                }
            }
            Ordering::Greater => {
                let added = new_blocks - old_blocks;
                if !self.table.has_free(&self.disk, added)? {
                    return Err(Error::NoSpace);
                }
                let mut tail = self.table.nth(&self.disk, head, old_blocks - 1)?;
                for _ in 0..added {
                    let id = self.alloc_block()?;
                    self.table.link(&self.disk, tail, id)?;
                    tail = id;
                }
            }
        }

        slot.entry.length = new_len as u64;
        self.write_entry(&slot.entry, slot.offset)
    }

    /// 清零`[new_len, old_len)`中仍留在链表上的部分
    fn zero_tail(&mut self, head: BlockId, new_len: usize, old_len: usize) -> Result<()> {
        let block_size = self.block_size();
        if new_len != 0 && new_len % block_size == 0 {
            return Ok(());
        }

        let index = new_len / block_size;
        let id = self.table.nth(&self.disk, head, index)?;
        let start = new_len % block_size;
        let end = (old_len - index * block_size).min(block_size);
        if end > start {
            self.disk.zero(id.offset(block_size) + start, end - start)?;
        }
        Ok(())
    }
}
