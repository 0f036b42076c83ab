use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use block_dev::Partition;
use vfs::{Error, Result};

use crate::config::{ChainRepair, MAGIC, MountOptions};
use crate::disk::Disk;
use crate::volume::{AllocTable, DirEntry, EntryKind, Record, Superblock, Times};
use crate::{BlockId, FatEntry};

/// 一个挂载好的ThornFAT实例。
///
/// 调用方负责串行化，驱动内部没有锁。
pub struct ThornFat {
    pub(crate) disk: Disk,
    pub(crate) superblock: Superblock,
    pub(crate) table: AllocTable,
    /// 根目录没有父目录，单独缓存
    pub(crate) root: DirEntry,
    pub(crate) options: MountOptions,
}

/// 目录项连同它在分区中的字节偏移
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub entry: DirEntry,
    pub offset: usize,
}

/// 一个目录的全部目录项
#[derive(Debug)]
pub(crate) struct Listing {
    pub slots: Vec<Slot>,
    /// 跳过开头的`.`与`..`后第一个普通目录项的下标
    pub first_index: usize,
}

impl ThornFat {
    /// 在空白分区上建立文件系统：写超级块，清空分配表，
    /// 并在根目录块里放好`.`与`..`。
    pub fn make(dev: Arc<dyn Partition>, block_size: usize, options: MountOptions) -> Result<Self> {
        let superblock = Superblock::new(dev.len(), block_size)?;
        let disk = Disk::new(dev);
        disk.write_record(0, &superblock)?;

        let mut table = AllocTable::new(&superblock);
        let root_block = superblock.root();
        table.format(&disk, root_block)?;
        disk.zero(root_block.offset(block_size), block_size)?;

        let mut root = DirEntry::new(
            ".",
            EntryKind::Directory,
            2 * DirEntry::SIZE as u64,
            Times::at((options.clock)()),
        )?;
        root.set_start(Some(root_block));

        let mut fs = Self {
            disk,
            superblock,
            table,
            root: root.clone(),
            options,
        };
        fs.write_entry(&root, fs.root_offset())?;
        fs_debug!(
            fs,
            "formatted {} blocks of {} bytes, root at block {}",
            fs.superblock.block_count,
            block_size,
            root_block
        );
        Ok(fs)
    }

    /// 挂载已有的文件系统
    pub fn mount(dev: Arc<dyn Partition>, options: MountOptions) -> Result<Self> {
        let disk = Disk::new(dev);
        let superblock: Superblock = disk.read_record(0)?;
        if superblock.magic != MAGIC {
            return Err(Error::InvalidArgument);
        }
        superblock.validate(disk.len())?;

        let root: DirEntry = disk.read_record(superblock.root_offset())?;
        if !root.is_dir() || root.start() != Some(superblock.root()) {
            return Err(Error::Corrupted);
        }

        let fs = Self {
            disk,
            table: AllocTable::new(&superblock),
            superblock,
            root,
            options,
        };
        fs_debug!(fs, "mounted, {} blocks of {} bytes", fs.superblock.block_count, fs.block_size());
        Ok(fs)
    }

    pub fn block_size(&self) -> usize {
        self.superblock.block_size()
    }

    pub fn block_count(&self) -> usize {
        self.superblock.block_count()
    }

    /// 空闲块数，第一次调用时扫描分配表。
    pub fn free_blocks(&mut self) -> Result<usize> {
        self.table.count_free(&self.disk)
    }
}

impl ThornFat {
    pub(crate) fn root_offset(&self) -> usize {
        self.superblock.root_offset()
    }

    pub(crate) fn root_slot(&self) -> Slot {
        Slot {
            entry: self.root.clone(),
            offset: self.root_offset(),
        }
    }

    pub(crate) fn now(&self) -> i64 {
        (self.options.clock)()
    }

    /// 容纳`len`字节所需的块数，空文件也占一块。
    pub(crate) fn blocks_for(&self, len: usize) -> usize {
        len.div_ceil(self.block_size()).max(1)
    }

    /// 写回目录项。写根目录时顺带更新紧随其后的`..`与缓存。
    pub(crate) fn write_entry(&mut self, entry: &DirEntry, offset: usize) -> Result<()> {
        fs_trace!(self, "write entry {:?} at {:#x}", entry.name(), offset);
        self.disk.write_record(offset, entry)?;

        if offset == self.root_offset() {
            let mut parent = entry.clone();
            parent.set_name("..")?;
            self.disk.write_record(offset + DirEntry::SIZE, &parent)?;
            self.root = entry.clone();
        }
        Ok(())
    }

    /// 把目录项清零，留下一个空位。
    pub(crate) fn erase_entry(&mut self, offset: usize) -> Result<()> {
        debug_assert_ne!(offset, self.root_offset());
        self.disk.zero(offset, DirEntry::SIZE)
    }

    /// 认领一个清零的块
    pub(crate) fn alloc_block(&mut self) -> Result<BlockId> {
        let id = self.table.claim(&self.disk)?;
        let block_size = self.block_size();
        self.disk.zero(id.offset(block_size), block_size)?;
        fs_trace!(self, "claimed block {id}");
        Ok(id)
    }

    /// 链表的块数。链表断在空闲或不可用的项上时只警告。
    pub(crate) fn chain_len(&self, start: BlockId) -> Result<usize> {
        let mut id = start;
        let mut len = 1;
        loop {
            match self.table.get(&self.disk, id)? {
                FatEntry::Final => return Ok(len),
                FatEntry::Next(next) => {
                    id = next;
                    len += 1;
                    if len > self.block_count() {
                        fs_error!(self, "chain from block {start} never ends");
                        return Err(Error::Corrupted);
                    }
                }
                entry => {
                    fs_warn!(self, "chain from block {start} runs into {entry:?} at block {id}");
                    return Ok(len);
                }
            }
        }
    }

    /// 沿链表读出目录项描述的全部内容
    pub(crate) fn read_content(&mut self, entry: &DirEntry) -> Result<Vec<u8>> {
        let len = entry.length as usize;
        let mut data = vec![0; len];
        if len == 0 {
            return Ok(data);
        }

        let block_size = self.block_size();
        let mut id = entry.start().ok_or(Error::Corrupted)?;
        let n_blocks = len.div_ceil(block_size);
        for (i, chunk) in data.chunks_mut(block_size).enumerate() {
            self.disk.read(id.offset(block_size), chunk)?;
            let next = self.table.get(&self.disk, id)?;
            if i + 1 == n_blocks {
                if let FatEntry::Next(surplus) = next {
                    self.stale_chain(entry, id, surplus)?;
                }
                break;
            }
            id = match next {
                FatEntry::Next(next) => next,
                other => {
                    fs_error!(self, "chain ends with {other:?} at block {id} before {len} bytes");
                    return Err(Error::Corrupted);
                }
            };
        }
        Ok(data)
    }

    /// 列出目录中所有目录项，包括空位。
    pub(crate) fn read_dir(&mut self, dir: &DirEntry) -> Result<Listing> {
        if !dir.is_dir() {
            return Err(Error::NotADirectory);
        }

        let raw = self.read_content(dir)?;
        let block_size = self.block_size();
        let per_block = block_size / DirEntry::SIZE;
        let count = raw.len() / DirEntry::SIZE;
        let blocks = match dir.start() {
            Some(start) => self.table.chain(&self.disk, start, count.div_ceil(per_block))?,
            None => Vec::new(),
        };

        let slots = raw
            .chunks_exact(DirEntry::SIZE)
            .enumerate()
            .map(|(i, raw)| {
                Ok(Slot {
                    entry: DirEntry::decode(raw)?,
                    offset: blocks[i / per_block].offset(block_size)
                        + (i % per_block) * DirEntry::SIZE,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let first_index = match slots.first().map(|slot| slot.entry.name_bytes()) {
            Some(b".") => 2,
            Some(b"..") => 1,
            _ => 0,
        };
        Ok(Listing { slots, first_index })
    }

    /// 目录中除了`.`与`..`没有别的
    pub(crate) fn dir_is_empty(&mut self, dir: &DirEntry) -> Result<bool> {
        let listing = self.read_dir(dir)?;
        Ok(listing
            .slots
            .iter()
            .all(|slot| slot.entry.is_free() || slot.entry.is_meta()))
    }

    fn stale_chain(&mut self, entry: &DirEntry, last: BlockId, surplus: BlockId) -> Result<()> {
        match self.options.chain_repair {
            ChainRepair::Warn => {
                fs_warn!(
                    self,
                    "{:?} holds blocks past its length, starting at block {surplus}",
                    entry.name()
                );
            }
            ChainRepair::Trim => {
                self.table.set(&self.disk, last, FatEntry::Final)?;
                let freed = self.table.free_chain(&self.disk, surplus)?;
                fs_warn!(self, "trimmed {freed} stale blocks from {:?}", entry.name());
            }
        }
        Ok(())
    }
}
