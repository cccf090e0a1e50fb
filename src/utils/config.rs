//! Configuration and constants for the CLI and scheduler.

use std::time::Duration;

/// Default debounce window before a submitted build starts
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Cooperative cancellation granularity.
// The build checks its cancellation flag once per this many samples, which
// bounds worst-case cancellation latency to one check interval of work.
pub const CANCEL_CHECK_INTERVAL: usize = 256;
