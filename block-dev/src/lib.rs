//! # 分区接口层
//!
//! 文件系统驱动只面对一个分区：一段以**字节偏移**寻址、有固定长度的存储。
//! 偏移相对于分区自身的起点，换算到整块磁盘是实现者的事。
//!
//! 每次读写要么完整完成，要么返回一个负的错误码，不存在“只写了一半”。

#![no_std]

extern crate alloc;

mod mem;

use core::any::Any;
use core::fmt;

pub use self::mem::MemPartition;

/// 分区驱动特质
pub trait Partition: Send + Sync + Any {
    /// 分区的字节长度
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 从`offset`起读满`buf`，返回读到的字节数。
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, DevError>;

    /// 从`offset`起写入整个`buf`，返回写入的字节数。
    fn write(&self, offset: usize, buf: &[u8]) -> Result<usize, DevError>;
}

/// 设备层错误，携带一个负的错误码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevError(i32);

impl DevError {
    /// -EIO
    pub const IO: Self = Self(-5);
    /// 越过分区末尾，-ENXIO
    pub const OUT_OF_RANGE: Self = Self(-6);

    /// `code`应为负数，正数会被取反。
    pub const fn new(code: i32) -> Self {
        if code > 0 { Self(-code) } else { Self(code) }
    }

    pub const fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device error {}", self.0)
    }
}
