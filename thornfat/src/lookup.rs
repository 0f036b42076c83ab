//! 路径解析

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vfs::{Error, Result};

use crate::control::{Slot, ThornFat};
use crate::path;
use crate::volume::DirEntry;

/// 父目录与待创建的名字
#[derive(Debug)]
pub(crate) struct Parent {
    pub dir: Slot,
    pub name: String,
}

impl ThornFat {
    /// 从根目录逐段查找，返回路径指向的目录项。
    ///
    /// `path`须已经过[`path::simplify`]。
    pub(crate) fn find(&mut self, path: &str) -> Result<Slot> {
        let mut slot = self.root_slot();
        for name in path::components(path) {
            slot = self.find_in(&slot.entry, name)?;
        }
        Ok(slot)
    }

    /// 返回路径最后一段所在的目录，以及最后一段的名字。
    /// 最后一段本身不必存在。
    pub(crate) fn find_parent(&mut self, path: &str) -> Result<Parent> {
        let cmps: Vec<&str> = path::components(path).collect();
        let Some((name, dirs)) = cmps.split_last() else {
            // 根目录没有父目录
            return Err(Error::InvalidArgument);
        };

        let mut dir = self.root_slot();
        for cmp in dirs {
            dir = self.find_in(&dir.entry, cmp)?;
        }
        if !dir.entry.is_dir() {
            return Err(Error::NotADirectory);
        }

        Ok(Parent {
            dir,
            name: name.to_string(),
        })
    }

    /// 在单个目录中查找
    fn find_in(&mut self, dir: &DirEntry, name: &str) -> Result<Slot> {
        if !dir.is_dir() {
            fs_debug!(self, "{:?} isn't a directory while looking up {name:?}", dir.name());
            return Err(Error::NotADirectory);
        }

        self.read_dir(dir)?
            .slots
            .into_iter()
            .find(|slot| !slot.entry.is_free() && slot.entry.name_bytes() == name.as_bytes())
            .ok_or(Error::NotFound)
    }
}
