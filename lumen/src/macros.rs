#[macro_export]
macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                panic!("{}: {:?}", $msg, why);
            }
        }
    };
}

#[macro_export]
macro_rules! lumen_error {
    ($($arg:tt)+) => {
        $crate::log::error!("lumen: {}", format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! lumen_warn {
    ($($arg:tt)+) => {
        $crate::log::warn!("lumen: {}", format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! lumen_info {
    ($($arg:tt)+) => {
        $crate::log::info!("lumen: {}", format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! lumen_debug {
    ($($arg:tt)+) => {
        $crate::log::debug!("lumen: {}", format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! lumen_trace {
    ($($arg:tt)+) => {
        $crate::log::trace!("lumen: {}", format_args!($($arg)+))
    };
}
