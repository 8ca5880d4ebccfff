//! Utility functions for the Athena control plane
//!
//! Timing and timeout helpers shared by the core client and the orchestrator.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::error::{Error, Result};

/// Formats a duration into a human-readable string
///
/// # Examples
///
/// ```
/// use common::utils::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
/// assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        let millis = duration.subsec_millis();
        if millis == 0 {
            let micros = duration.subsec_micros();
            return format!("{}µs", micros);
        }
        return format!("{}ms", millis);
    }

    let hours = total_secs / (60 * 60);
    let minutes = (total_secs % (60 * 60)) / 60;
    let seconds = total_secs % 60;

    let mut result = String::new();

    if hours > 0 {
        result.push_str(&format!("{}h ", hours));
    }

    if minutes > 0 || !result.is_empty() {
        result.push_str(&format!("{}m ", minutes));
    }

    result.push_str(&format!("{}s", seconds));

    result
}

/// Executes a future with a timeout
///
/// # Examples
///
/// ```
/// use common::utils::execute_with_timeout;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> common::Result<()> {
/// let value = execute_with_timeout(
///     async { Ok(42) },
///     Duration::from_secs(1),
///     "example operation",
/// )
/// .await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn execute_with_timeout<T, F>(
    future: F,
    duration: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(format!(
            "Operation '{}' timed out after {}",
            operation_name,
            format_duration(duration)
        ))),
    }
}

/// Awaits a future and returns its output together with the elapsed wall-clock time
pub async fn timed<T, F>(future: F) -> (T, Duration)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = future.await;
    (output, start.elapsed())
}

/// Converts a duration to fractional milliseconds
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
