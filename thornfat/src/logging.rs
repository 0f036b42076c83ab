//! 按挂载实例过滤的日志。
//!
//! 每条消息都带上实例的标签，且只有实例自己的级别允许时才交给`log`。

macro_rules! fs_log {
    ($fs:expr, $level:expr, $($arg:tt)+) => {{
        let level: log::Level = $level;
        if level <= $fs.options.log_level {
            log::log!(level, "[{}] {}", $fs.options.label, format_args!($($arg)+));
        }
    }};
}

macro_rules! fs_trace {
    ($fs:expr, $($arg:tt)+) => { fs_log!($fs, log::Level::Trace, $($arg)+) };
}

macro_rules! fs_debug {
    ($fs:expr, $($arg:tt)+) => { fs_log!($fs, log::Level::Debug, $($arg)+) };
}

macro_rules! fs_warn {
    ($fs:expr, $($arg:tt)+) => { fs_log!($fs, log::Level::Warn, $($arg)+) };
}

macro_rules! fs_error {
    ($fs:expr, $($arg:tt)+) => { fs_log!($fs, log::Level::Error, $($arg)+) };
}
