//! 新建目录项，并在父目录中为它找到位置。

use vfs::{Error, Result};

use crate::FatEntry;
use crate::control::{Slot, ThornFat};
use crate::lookup::Parent;
use crate::volume::{DirEntry, EntryKind, Record, Times};

/// 新建的目录项与（可能已变长的）父目录
#[derive(Debug)]
pub(crate) struct Created {
    pub slot: Slot,
    pub parent: Slot,
}

impl ThornFat {
    /// 在`path`处新建一个长度为`length`的目录项。
    ///
    /// `alloc`为`false`时不分配块链表，只占一个位置，重命名时使用。
    /// 空间不足时在改动任何东西之前失败；中途失败会归还已认领的块。
    /// 调用方负责补全权限与属主并写回。
    pub(crate) fn new_file(
        &mut self,
        path: &str,
        length: usize,
        kind: EntryKind,
        alloc: bool,
    ) -> Result<Created> {
        let Parent { dir: mut parent, name } = self.find_parent(path)?;
        let mut entry = DirEntry::new(&name, kind, length as u64, Times::at(self.now()))?;

        let n_blocks = if alloc { self.blocks_for(length) } else { 0 };
        if !self.table.has_free(&self.disk, n_blocks)? {
            fs_debug!(self, "no room for {n_blocks} blocks of {path:?}");
            return Err(Error::NoSpace);
        }

        let head = if alloc {
            Some(self.alloc_block()?)
        } else {
            None
        };
        entry.set_start(head);

        let offset = match self.place(&mut parent, &entry, n_blocks.saturating_sub(1)) {
            Ok(offset) => offset,
            Err(err) => {
                if let Some(head) = head {
                    self.table.release(&self.disk, head)?;
                }
                return Err(err);
            }
        };

        if let Some(head) = head {
            let mut tail = head;
            for _ in 1..n_blocks {
                match self.alloc_block() {
                    Ok(id) => {
                        self.table.link(&self.disk, tail, id)?;
                        tail = id;
                    }
                    Err(err) => {
                        self.table.free_chain(&self.disk, head)?;
                        self.erase_entry(offset)?;
                        return Err(err);
                    }
                }
            }
        }

        fs_debug!(self, "created {path:?} at {offset:#x}");
        Ok(Created {
            slot: Slot { entry, offset },
            parent,
        })
    }

    /// 为`entry`在`parent`中找一个位置并写入，返回位置的偏移。
    ///
    /// 依次尝试：复用空位；在第一块内追加；在最后一块内追加；给父目录再接一块。
/// 链表上已经挂着长度之外的块时，接的就是那一块。
    /// 后三种情况父目录长度增加一个目录项并写回。
    /// `pending`是新文件之后还要认领的块数，接块前一并检查。
    fn place(&mut self, parent: &mut Slot, entry: &DirEntry, pending: usize) -> Result<usize> {
        let block_size = self.block_size();
        let listing = self.read_dir(&parent.entry)?;

        if let Some(free) = listing.slots[listing.first_index..]
            .iter()
            .find(|slot| slot.entry.is_free())
        {
            fs_trace!(self, "reuse slot at {:#x}", free.offset);
            self.write_entry(entry, free.offset)?;
            return Ok(free.offset);
        }

        let head = parent.entry.start().ok_or(Error::Corrupted)?;
        let length = parent.entry.length as usize;
        let offset = if length + DirEntry::SIZE <= block_size {
            head.offset(block_size) + length
        } else {
            let used = length.div_ceil(block_size);
            let tail = self.table.nth(&self.disk, head, used - 1)?;
            let rest = length - (used - 1) * block_size;
            if rest + DirEntry::SIZE <= block_size {
                tail.offset(block_size) + rest
            } else if let FatEntry::Next(stale) = self.table.get(&self.disk, tail)? {
                // 链表比长度长：接着用已挂上的块，不能把它从链表上摘掉
                self.disk.zero(stale.offset(block_size), block_size)?;
                fs_debug!(self, "{:?} grows into stale block {stale}", parent.entry.name());
                stale.offset(block_size)
            } else {
                if !self.table.has_free(&self.disk, 1 + pending)? {
                    return Err(Error::NoSpace);
                }
                let id = self.alloc_block()?;
                self.table.link(&self.disk, tail, id)?;
                fs_debug!(self, "{:?} grows into block {id}", parent.entry.name());
                id.offset(block_size)
            }
        };

        self.write_entry(entry, offset)?;
        parent.entry.length += DirEntry::SIZE as u64;
        self.write_entry(&parent.entry, parent.offset)?;
        Ok(offset)
    }
}
