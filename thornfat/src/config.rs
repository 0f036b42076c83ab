use alloc::string::String;

use log::LevelFilter;

/// 超级块中的格式标识
pub const MAGIC: u32 = 0xfa91_283e;

/// 文件名的最大字节数
pub const NAME_MAX: usize = 255;

/// 超级块、分配表、根目录各占至少一块
pub const MIN_BLOCKS: usize = 3;

/// 目录的块链表比记录的长度还长时怎么办
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainRepair {
    /// 只记一条警告，磁盘保持原样
    #[default]
    Warn,
    /// 截断多余的块并归还分配表
    Trim,
}

#[derive(Debug, Clone)]
pub struct MountOptions {
    /// 日志里区分不同挂载实例的标签
    pub label: String,
    /// 本实例允许输出的最高日志级别
    pub log_level: LevelFilter,
    pub chain_repair: ChainRepair,
    /// 时间戳来源
    pub clock: fn() -> i64,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            label: String::from("thornfat"),
            log_level: LevelFilter::Trace,
            chain_repair: ChainRepair::default(),
            clock: || 0,
        }
    }
}

impl MountOptions {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: String::from(label),
            ..Self::default()
        }
    }
}
