use enumflags2::bitflags;

/// 文件的权限位。驱动只负责保存，不做检查。
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    OtherExec = 0o1,
    OtherWrite = 0o2,
    OtherRead = 0o4,
    GroupExec = 0o10,
    GroupWrite = 0o20,
    GroupRead = 0o40,
    OwnerExec = 0o100,
    OwnerWrite = 0o200,
    OwnerRead = 0o400,
    Sticky = 0o1000,
    SetGid = 0o2000,
    SetUid = 0o4000,
}
