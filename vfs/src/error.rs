use block_dev::DevError;
use derive_more::Display;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Error {
    #[display(fmt = "file exists")]
    AlreadyExists,
    #[display(fmt = "no such file or directory")]
    NotFound,
    #[display(fmt = "is a directory")]
    IsADirectory,
    #[display(fmt = "not a directory")]
    NotADirectory,
    #[display(fmt = "directory not empty")]
    DirectoryNotEmpty,
    #[display(fmt = "file name too long")]
    NameTooLong,
    #[display(fmt = "no space left on device")]
    NoSpace,
    #[display(fmt = "invalid argument")]
    InvalidArgument,
    #[display(fmt = "operation not supported")]
    Unsupported,
    /// 磁盘上的结构自相矛盾
    #[display(fmt = "filesystem structure corrupted")]
    Corrupted,
    /// 设备返回的负错误码
    #[display(fmt = "I/O error ({})", _0)]
    Io(i32),
}

impl Error {
    /// 对应的负错误码
    pub const fn errno(self) -> i32 {
        match self {
            Self::AlreadyExists => -17,
            Self::NotFound => -2,
            Self::IsADirectory => -21,
            Self::NotADirectory => -20,
            Self::DirectoryNotEmpty => -39,
            Self::NameTooLong => -36,
            Self::NoSpace => -28,
            Self::InvalidArgument => -22,
            Self::Unsupported => -38,
            Self::Corrupted => -5,
            Self::Io(code) => code,
        }
    }
}

impl From<DevError> for Error {
    fn from(err: DevError) -> Self {
        Self::Io(err.code())
    }
}
