//! 对外的文件系统操作

use alloc::string::String;
use alloc::vec::Vec;

use vfs::{DirEntryType, Error, FileSystem, FsStat, Result, Stat};

use crate::allocator::Created;
use crate::config::{MAGIC, NAME_MAX};
use crate::control::{Slot, ThornFat};
use crate::path;
use crate::volume::{DirEntry, EntryKind, Record, Superblock};

impl ThornFat {
    /// 列出目录，非根目录额外给出`.`。
    pub fn ls(&mut self, path: &str) -> Result<Vec<vfs::DirEntry>> {
        let path = path::simplify(path);
        let dir = self.find(&path)?;
        if !dir.entry.is_dir() {
            return Err(Error::NotADirectory);
        }

        let mut entries = Vec::new();
        if dir.offset != self.root_offset() {
            entries.push(vfs::DirEntry {
                inode: inode_of(&dir.entry),
                ty: DirEntryType::Directory,
                name: String::from("."),
            });
        }
        for slot in self.read_dir(&dir.entry)?.slots {
            if slot.entry.is_free() {
                continue;
            }
            entries.push(vfs::DirEntry {
                inode: inode_of(&slot.entry),
                ty: kind_of(&slot.entry),
                name: String::from(slot.entry.name()),
            });
        }
        Ok(entries)
    }

    /// 找到一个普通文件
    fn find_file(&mut self, path: &str) -> Result<Slot> {
        let slot = self.find(path)?;
        if slot.entry.is_dir() {
            return Err(Error::IsADirectory);
        }
        Ok(slot)
    }

    /// 归还块链表并清零目录项
    fn remove(&mut self, slot: &Slot) -> Result<()> {
        if let Some(head) = slot.entry.start() {
            let freed = self.table.free_chain(&self.disk, head)?;
            fs_trace!(self, "freed {freed} blocks of {:?}", slot.entry.name());
        }
        self.erase_entry(slot.offset)
    }
}

impl FileSystem for ThornFat {
    fn create(&mut self, path: &str, mode: u32, uid: u32, gid: u32) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "create {path:?}");
        if self.exists(&path)? {
            return Err(Error::AlreadyExists);
        }

        let Created { mut slot, .. } = self.new_file(&path, 0, EntryKind::File, true)?;
        slot.entry.mode = mode;
        slot.entry.uid = uid;
        slot.entry.gid = gid;
        self.write_entry(&slot.entry, slot.offset)
    }

    fn mkdir(&mut self, path: &str, mode: u32, uid: u32, gid: u32) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "mkdir {path:?}");
        if self.exists(&path)? {
            return Err(Error::AlreadyExists);
        }

        // 只放得下`..`
        let Created { mut slot, parent } =
            self.new_file(&path, DirEntry::SIZE, EntryKind::Directory, true)?;
        slot.entry.mode = mode;
        slot.entry.uid = uid;
        slot.entry.gid = gid;
        self.write_entry(&slot.entry, slot.offset)?;

        let head = slot.entry.start().ok_or(Error::Corrupted)?;
        let mut dotdot = parent.entry;
        dotdot.set_name("..")?;
        self.write_entry(&dotdot, head.offset(self.block_size()))
    }

    fn write(&mut self, path: &str, buf: &[u8], offset: usize) -> Result<usize> {
        let path = path::simplify(path);
        fs_debug!(self, "write {} bytes at {offset} to {path:?}", buf.len());
        let mut slot = self.find_file(&path)?;
        if buf.is_empty() {
            return Ok(0);
        }

        let end = offset.checked_add(buf.len()).ok_or(Error::InvalidArgument)?;
        if end > slot.entry.length as usize {
            self.resize(&mut slot, end)?;
        }

        let block_size = self.block_size();
        let head = slot.entry.start().ok_or(Error::Corrupted)?;
        let mut id = self.table.nth(&self.disk, head, offset / block_size)?;
        let mut pos = offset % block_size;
        let mut written = 0;
        loop {
            let n = (block_size - pos).min(buf.len() - written);
            self.disk
                .write(id.offset(block_size) + pos, &buf[written..written + n])?;
            written += n;
            if written == buf.len() {
                break;
            }
            pos = 0;
            id = self.table.next(&self.disk, id)?.ok_or(Error::Corrupted)?;
        }

        slot.entry.times.modified = self.now();
        self.write_entry(&slot.entry, slot.offset)?;
        Ok(written)
    }

    fn read(&mut self, path: &str, buf: &mut [u8], offset: usize) -> Result<usize> {
        let path = path::simplify(path);
        fs_debug!(self, "read {} bytes at {offset} from {path:?}", buf.len());
        let mut slot = self.find_file(&path)?;

        let len = slot.entry.length as usize;
        if offset >= len || buf.is_empty() {
            return Ok(0);
        }
        let end = len.min(offset.saturating_add(buf.len()));

        let block_size = self.block_size();
        let head = slot.entry.start().ok_or(Error::Corrupted)?;
        let mut id = self.table.nth(&self.disk, head, offset / block_size)?;
        let mut pos = offset % block_size;
        let mut read = 0;
        let total = end - offset;
        loop {
            let n = (block_size - pos).min(total - read);
            self.disk
                .read(id.offset(block_size) + pos, &mut buf[read..read + n])?;
            read += n;
            if read == total {
                break;
            }
            pos = 0;
            match self.table.next(&self.disk, id)? {
                Some(next) => id = next,
                None => break,
            }
        }

        slot.entry.times.accessed = self.now();
        self.write_entry(&slot.entry, slot.offset)?;
        Ok(read)
    }

    fn readdir(&mut self, path: &str, filler: &mut dyn FnMut(&str, usize)) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "readdir {path:?}");
        let dir = self.find(&path)?;
        if !dir.entry.is_dir() {
            return Err(Error::NotADirectory);
        }

        // 根目录自己存着`.`
        if dir.offset != self.root_offset() {
            filler(".", 0);
        }
        for slot in self.read_dir(&dir.entry)?.slots {
            if !slot.entry.is_free() {
                filler(slot.entry.name(), slot.offset);
            }
        }
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let (from, to) = (path::simplify(from), path::simplify(to));
        fs_debug!(self, "rename {from:?} -> {to:?}");
        if from == "/" || to == "/" {
            return Err(Error::InvalidArgument);
        }

        let src = self.find(&from)?;
        if from == to {
            return Ok(());
        }
        if path::is_within(&to, &from) {
            return Err(Error::InvalidArgument);
        }

        let dest_offset = match self.find(&to) {
            Ok(dest) => {
                if dest.entry.is_dir() {
                    return Err(Error::IsADirectory);
                }
                self.remove(&dest)?;
                dest.offset
            }
            Err(Error::NotFound) => {
                self.new_file(&to, 0, src.entry.kind, false)?
                    .slot
                    .offset
            }
            Err(err) => return Err(err),
        };

        let mut moved = src.entry;
        moved.set_name(path::basename(&to))?;
        self.write_entry(&moved, dest_offset)?;
        self.erase_entry(src.offset)?;

        // 目录搬家后，它的`..`要指向新的父目录
        if moved.is_dir() {
            let parent = self.find_parent(&to)?.dir;
            let head = moved.start().ok_or(Error::Corrupted)?;
            let mut dotdot = parent.entry;
            dotdot.set_name("..")?;
            self.write_entry(&dotdot, head.offset(self.block_size()))?;
        }
        Ok(())
    }

    fn unlink(&mut self, path: &str) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "unlink {path:?}");
        let slot = self.find_file(&path)?;
        self.remove(&slot)
    }

    fn rmdir(&mut self, path: &str) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "rmdir {path:?}");
        if path == "/" {
            return Err(Error::InvalidArgument);
        }

        let slot = self.find(&path)?;
        if !slot.entry.is_dir() {
            return Err(Error::NotADirectory);
        }
        if !self.dir_is_empty(&slot.entry)? {
            return Err(Error::DirectoryNotEmpty);
        }
        self.remove(&slot)
    }

    fn truncate(&mut self, path: &str, size: usize) -> Result<()> {
        let path = path::simplify(path);
        fs_debug!(self, "truncate {path:?} to {size}");
        let mut slot = self.find_file(&path)?;
        self.resize(&mut slot, size)
    }

    /// 没有文件描述符表，按路径截断。
    fn ftruncate(&mut self, path: &str, size: usize) -> Result<()> {
        self.truncate(path, size)
    }

    fn getattr(&mut self, path: &str) -> Result<Stat> {
        let path = path::simplify(path);
        let slot = self.find(&path)?;
        let entry = &slot.entry;
        let blocks = match entry.start() {
            Some(head) => self.chain_len(head)?,
            None => 0,
        };

        Ok(Stat {
            kind: kind_of(entry),
            inode: inode_of(entry),
            mode: entry.mode,
            uid: entry.uid,
            gid: entry.gid,
            size: entry.length,
            block_size: self.block_size() as u64,
            blocks: blocks as u64,
            created: entry.times.created,
            modified: entry.times.modified,
            accessed: entry.times.accessed,
        })
    }

    fn statfs(&mut self) -> Result<FsStat> {
        let free = self.free_blocks()?;
        Ok(FsStat {
            magic: self.superblock.magic,
            name_max: NAME_MAX,
            block_size: self.block_size(),
            total_blocks: self.block_count(),
            free_blocks: free,
            available_blocks: free,
        })
    }

    fn getsize(&mut self, path: &str) -> Result<usize> {
        let path = path::simplify(path);
        Ok(self.find(&path)?.entry.length as usize)
    }

    fn isdir(&mut self, path: &str) -> Result<bool> {
        let path = path::simplify(path);
        Ok(self.find(&path)?.entry.is_dir())
    }

    fn isfile(&mut self, path: &str) -> Result<bool> {
        let path = path::simplify(path);
        Ok(self.find(&path)?.entry.is_file())
    }

    fn exists(&mut self, path: &str) -> Result<bool> {
        let path = path::simplify(path);
        match self.find(&path) {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn utimens(&mut self, path: &str, time: i64) -> Result<()> {
        let path = path::simplify(path);
        let mut slot = self.find(&path)?;
        slot.entry.times.accessed = time;
        slot.entry.times.modified = time;
        self.write_entry(&slot.entry, slot.offset)
    }

    fn verify(&self) -> bool {
        self.disk
            .read_record::<Superblock>(0)
            .is_ok_and(|sb| sb.magic == MAGIC)
    }
}

fn kind_of(entry: &DirEntry) -> DirEntryType {
    match entry.kind {
        EntryKind::Directory => DirEntryType::Directory,
        EntryKind::File => DirEntryType::Regular,
    }
}

/// 起始块编号就是inode号
fn inode_of(entry: &DirEntry) -> u64 {
    entry.start().map_or(0, |id| id.get() as u64)
}
