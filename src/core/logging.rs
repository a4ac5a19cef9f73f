//! Logging abstraction
//!
//! Unified logging macros that work across targets:
//! - Embedded (`defmt` feature): defmt over RTT
//! - Host tests and `std` builds: `println!` / `eprintln!` with a level prefix
//! - Anything else: arguments are type-checked and discarded
//!
//! Format strings must stay within the subset both backends accept: plain
//! `{}` / `{:?}` placeholders, no precision or width specifiers.
//! Values from `glider_core` are logged through their `as_str()` names.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(any(test, feature = "std"), not(feature = "defmt")))]
        println!("[INFO] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "std", feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(any(test, feature = "std"), not(feature = "defmt")))]
        println!("[WARN] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "std", feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(any(test, feature = "std"), not(feature = "defmt")))]
        eprintln!("[ERROR] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "std", feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(any(test, feature = "std"), not(feature = "defmt")))]
        println!("[DEBUG] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "std", feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(any(test, feature = "std"), not(feature = "defmt")))]
        println!("[TRACE] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "std", feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}
