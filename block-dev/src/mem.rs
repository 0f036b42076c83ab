use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::{DevError, Partition};

/// 内存中的分区，测试和打包工具都用它。
#[derive(Debug)]
pub struct MemPartition {
    data: Mutex<Vec<u8>>,
}

impl MemPartition {
    pub fn new(len: usize) -> Self {
        Self {
            data: Mutex::new(vec![0; len]),
        }
    }

    /// 拷贝出整个分区的内容
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    fn check(len: usize, offset: usize, size: usize) -> Result<(), DevError> {
        match offset.checked_add(size) {
            Some(end) if end <= len => Ok(()),
            _ => Err(DevError::OUT_OF_RANGE),
        }
    }
}

impl Partition for MemPartition {
    fn len(&self) -> usize {
        self.data.lock().len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, DevError> {
        let data = self.data.lock();
        Self::check(data.len(), offset, buf.len())?;
        buf.copy_from_slice(&data[offset..offset + buf.len()]);
        Ok(buf.len())
    }

    fn write(&self, offset: usize, buf: &[u8]) -> Result<usize, DevError> {
        let mut data = self.data.lock();
        Self::check(data.len(), offset, buf.len())?;
        data[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let part = MemPartition::new(16);
        assert_eq!(Ok(4), part.write(12, b"abcd"));
        assert_eq!(Err(DevError::OUT_OF_RANGE), part.write(13, b"abcd"));

        let mut buf = [0; 4];
        assert_eq!(Ok(4), part.read(12, &mut buf));
        assert_eq!(b"abcd", &buf);
        assert_eq!(Err(DevError::OUT_OF_RANGE), part.read(usize::MAX, &mut buf));
    }
}
