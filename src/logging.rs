//! Logging macros
//!
//! - Device (`nrf9160`): defmt frames over RTT
//! - Host unit tests: `println!`/`eprintln!`
//! - Any other host build: no-op
//!
//! Format strings must stay within the subset both defmt and `core::fmt`
//! accept, i.e. plain `{}` placeholders.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "nrf9160")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "nrf9160"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "nrf9160"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "nrf9160")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "nrf9160"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "nrf9160"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "nrf9160")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "nrf9160"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "nrf9160"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "nrf9160")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "nrf9160"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "nrf9160"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}
