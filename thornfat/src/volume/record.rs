//! 目录项。
//!
//! 目录的内容就是一串首尾相接的目录项，像普通文件一样沿块链表读取。
//! 删除只是把目录项清零，空位留给之后的文件复用，从不压缩。

use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite, binrw};
use vfs::{Error, Result};

use crate::BlockId;
use crate::config::NAME_MAX;
use crate::volume::Record;

/// 文件名缓冲区的容量，留一个字节给结尾的NUL。
pub const NAME_CAP: usize = NAME_MAX + 1;

const TIMES_SIZE: usize = 3 * mem::size_of::<i64>();

/// 补齐到64的倍数
const PADDING: usize = 12;

#[binrw]
#[brw(repr = i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File = 0,
    Directory = 1,
}

#[binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Times {
    pub created: i64,
    pub modified: i64,
    pub accessed: i64,
}

impl Times {
    pub const fn at(time: i64) -> Self {
        Self {
            created: time,
            modified: time,
            accessed: time,
        }
    }
}

#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// NUL结尾
    name: [u8; NAME_CAP],

    pub times: Times,

    /// 文件：内容的字节数；目录：子目录项的总字节数
    pub length: u64,

    /// 块链表的第一块，0表示空位
    pub start_block: i32,

    pub kind: EntryKind,

    pub mode: u32,

    pub uid: u32,

    pub gid: u32,

    /// Reserved, must be 0
    padding: [u8; PADDING],
}

const _: () = assert!(<DirEntry as Record>::SIZE % 64 == 0);

impl DirEntry {
    pub fn new(name: &str, kind: EntryKind, length: u64, times: Times) -> Result<Self> {
        let mut entry = Self::zeroed();
        entry.set_name(name)?;
        entry.kind = kind;
        entry.length = length;
        entry.times = times;
        Ok(entry)
    }

    /// 全零的目录项，也就是一个空位。
    pub const fn zeroed() -> Self {
        Self {
            name: [0; NAME_CAP],
            times: Times::at(0),
            length: 0,
            start_block: 0,
            kind: EntryKind::File,
            mode: 0,
            uid: 0,
            gid: 0,
            padding: [0; PADDING],
        }
    }

    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_CAP);
        &self.name[..len]
    }

    pub fn name(&self) -> &str {
        core::str::from_utf8(self.name_bytes()).unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if name.len() > NAME_MAX {
            return Err(Error::NameTooLong);
        }
        if name.is_empty() || name.bytes().any(|b| b == 0 || b == b'/') {
            return Err(Error::InvalidArgument);
        }

        self.name = [0; NAME_CAP];
        self.name[..name.len()].copy_from_slice(name.as_bytes());
        Ok(())
    }

    /// 链表的第一块
    pub fn start(&self) -> Option<BlockId> {
        BlockId::from_start(self.start_block)
    }

    pub fn set_start(&mut self, block: Option<BlockId>) {
        self.start_block = block.map_or(0, BlockId::as_start);
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// 空位可以被新文件直接复用。
    ///
    /// 没有块链表的目录项都是空位；目录至少存着`..`，长度为0的目录同样是空位。
    /// 长度为0的文件仍持有一块，不是空位。
    pub fn is_free(&self) -> bool {
        self.start().is_none() || (self.is_dir() && self.length == 0)
    }

    /// `.`或`..`
    pub fn is_meta(&self) -> bool {
        matches!(self.name_bytes(), b"." | b"..")
    }
}

impl Record for DirEntry {
    const SIZE: usize = NAME_CAP
        + TIMES_SIZE
        + mem::size_of::<u64>()
        + mem::size_of::<i32>()
        + mem::size_of::<i32>()
        + 3 * mem::size_of::<u32>()
        + PADDING;

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

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn layout() {
        let mut entry = DirEntry::new("hello", EntryKind::Directory, 640, Times::at(7)).unwrap();
        entry.start_block = 5;
        entry.mode = 0o755;
        let raw = entry.encode().unwrap();

        assert_eq!(DirEntry::SIZE, raw.len());
        assert_eq!(b"hello\0", &raw[..6]);
        assert_eq!(&7i64.to_le_bytes()[..], &raw[NAME_CAP..NAME_CAP + 8]);
        assert_eq!(&640u64.to_le_bytes()[..], &raw[280..288]);
        assert_eq!(&5i32.to_le_bytes()[..], &raw[288..292]);
        assert_eq!(&1i32.to_le_bytes()[..], &raw[292..296]);
        assert_eq!(&0o755u32.to_le_bytes()[..], &raw[296..300]);
        assert_eq!(entry, DirEntry::decode(&raw).unwrap());
    }

    #[test]
    fn unknown_kind() {
        let mut raw = DirEntry::zeroed().encode().unwrap();
        raw[292] = 9;
        assert_eq!(Err(Error::Corrupted), DirEntry::decode(&raw));
    }

    #[test]
    fn names() {
        let mut entry = DirEntry::zeroed();
        let long: String = "x".repeat(NAME_MAX + 1);
        assert_eq!(Err(Error::NameTooLong), entry.set_name(&long));
        assert_eq!(Ok(()), entry.set_name(&long[..NAME_MAX]));
        assert_eq!(NAME_MAX, entry.name().len());
        assert_eq!(Err(Error::InvalidArgument), entry.set_name("a/b"));
        assert_eq!(Err(Error::InvalidArgument), entry.set_name(""));

        entry.set_name("..").unwrap();
        assert!(entry.is_meta());
        assert_eq!("..", entry.name());
    }

    #[test]
    fn free_slots() {
        let mut entry = DirEntry::zeroed();
        assert!(entry.is_free());

        entry.start_block = 4;
        assert!(!entry.is_free());

        entry.kind = EntryKind::Directory;
        assert!(entry.is_free());
        entry.length = DirEntry::SIZE as u64;
        assert!(!entry.is_free());
    }
}
