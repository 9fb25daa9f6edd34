//! This module provides observability hooks for the codec.
//!
//! The `log_metric!` macro emits one structured key-value line per event through
//! the `log` facade at debug level. It is compiled out of release builds, so
//! calls to it cost nothing in production.

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use dtc::log_metric;
/// let words = 42;
/// log_metric!("event"="allocate", "words"=&words);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!("DTC_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
