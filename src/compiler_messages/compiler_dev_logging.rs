// ANNOTATION LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_annotations")]
macro_rules! annotation_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_annotations"))]
macro_rules! annotation_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// TYPE TABLE LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_types")]
macro_rules! types_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_types"))]
macro_rules! types_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// METADATA LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_metadata")]
macro_rules! metadata_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_metadata"))]
macro_rules! metadata_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// Extra timer logging
#[macro_export]
#[cfg(feature = "detailed_timers")]
macro_rules! timer_log {
    ($time:expr, $msg:expr) => {
        saying::say!($msg, Green #$time.elapsed());
    };
}

#[macro_export]
#[cfg(not(feature = "detailed_timers"))]
macro_rules! timer_log {
    ($time:expr, $msg:expr) => {
        // Nothing
    };
}
