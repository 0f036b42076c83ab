use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use block_dev::{DevError, Partition};
use send_wrapper::SendWrapper;

/// 把宿主机上的镜像文件当作一个分区
#[derive(Debug)]
pub struct BlockFile {
    inner: SendWrapper<RefCell<File>>,
    len: usize,
}

impl BlockFile {
    pub fn new(fd: File) -> std::io::Result<Self> {
        let len = fd.metadata()?.len() as usize;
        Ok(Self {
            inner: SendWrapper::new(RefCell::new(fd)),
            len,
        })
    }

    fn check(&self, offset: usize, size: usize) -> Result<(), DevError> {
        match offset.checked_add(size) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(DevError::OUT_OF_RANGE),
        }
    }
}

fn io_error(err: std::io::Error) -> DevError {
    log::error!("image I/O failed: {err}");
    DevError::new(err.raw_os_error().unwrap_or(5))
}

impl Partition for BlockFile {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, DevError> {
        self.check(offset, buf.len())?;
        let mut file = self.inner.borrow_mut();
        file.seek(SeekFrom::Start(offset as u64)).map_err(io_error)?;
        file.read_exact(buf).map_err(io_error)?;
        Ok(buf.len())
    }

    fn write(&self, offset: usize, buf: &[u8]) -> Result<usize, DevError> {
        self.check(offset, buf.len())?;
        let mut file = self.inner.borrow_mut();
        file.seek(SeekFrom::Start(offset as u64)).map_err(io_error)?;
        file.write_all(buf).map_err(io_error)?;
        Ok(buf.len())
    }
}
