//! 分区上的字节读写

use alloc::sync::Arc;
use alloc::vec;

use block_dev::{DevError, Partition};
use vfs::{Error, Result};

use crate::volume::Record;

/// 一次清零的最大字节数
const ZERO_CHUNK: usize = 512;

pub struct Disk {
    /// 底层分区的引用
    dev: Arc<dyn Partition>,
}

impl Disk {
    pub fn new(dev: Arc<dyn Partition>) -> Self {
        Self { dev }
    }

    pub fn len(&self) -> usize {
        self.dev.len()
    }

    pub fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        match self.dev.read(offset, buf)? {
            n if n == buf.len() => Ok(()),
            _ => Err(Error::from(DevError::IO)),
        }
    }

    pub fn write(&self, offset: usize, buf: &[u8]) -> Result<()> {
        match self.dev.write(offset, buf)? {
            n if n == buf.len() => Ok(()),
            _ => Err(Error::from(DevError::IO)),
        }
    }

    pub fn zero(&self, offset: usize, len: usize) -> Result<()> {
        let zeros = [0u8; ZERO_CHUNK];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(ZERO_CHUNK);
            self.write(offset + done, &zeros[..n])?;
            done += n;
        }
        Ok(())
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        let mut raw = [0; 4];
        self.read(offset, &mut raw)?;
        Ok(i32::from_le_bytes(raw))
    }

    pub fn write_i32(&self, offset: usize, value: i32) -> Result<()> {
        self.write(offset, &value.to_le_bytes())
    }

    pub fn read_record<R: Record>(&self, offset: usize) -> Result<R> {
        let mut raw = vec![0; R::SIZE];
        self.read(offset, &mut raw)?;
        R::decode(&raw)
    }

    pub fn write_record<R: Record>(&self, offset: usize, record: &R) -> Result<()> {
        self.write(offset, &record.encode()?)
    }
}
