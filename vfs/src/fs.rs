use crate::{Error, FsStat, Result, Stat};

/// 挂载层驱动文件系统所用的动词。
///
/// 所有调用都是同步的，调用方负责对同一实例串行化。
/// 路径均为分区内的绝对路径。
pub trait FileSystem {
    fn create(&mut self, path: &str, mode: u32, uid: u32, gid: u32) -> Result<()>;

    fn mkdir(&mut self, path: &str, mode: u32, uid: u32, gid: u32) -> Result<()>;

    /// 返回写入的字节数
    fn write(&mut self, path: &str, buf: &[u8], offset: usize) -> Result<usize>;

    /// 返回读到的字节数，越过文件末尾时为0。
    fn read(&mut self, path: &str, buf: &mut [u8], offset: usize) -> Result<usize>;

    /// 对目录下每一项调用`filler(name, offset)`。
    fn readdir(&mut self, path: &str, filler: &mut dyn FnMut(&str, usize)) -> Result<()>;

    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    fn unlink(&mut self, path: &str) -> Result<()>;

    fn rmdir(&mut self, path: &str) -> Result<()>;

    fn truncate(&mut self, path: &str, size: usize) -> Result<()>;

    fn ftruncate(&mut self, _path: &str, _size: usize) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn open(&mut self, _path: &str) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn release(&mut self, _path: &str) -> Result<()> {
        Ok(())
    }

    fn getattr(&mut self, path: &str) -> Result<Stat>;

    fn statfs(&mut self) -> Result<FsStat>;

    fn getsize(&mut self, path: &str) -> Result<usize>;

    fn isdir(&mut self, path: &str) -> Result<bool>;

    fn isfile(&mut self, path: &str) -> Result<bool>;

    /// 不存在时为`Ok(false)`，路径本身走不通时报错。
    fn exists(&mut self, path: &str) -> Result<bool>;

    /// 同时设置访问时间与修改时间
    fn utimens(&mut self, path: &str, time: i64) -> Result<()>;

    /// 分区上是否已有本文件系统
    fn verify(&self) -> bool;
}
