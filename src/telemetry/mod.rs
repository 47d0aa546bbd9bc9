mod metrics;
mod tracing;

pub use self::metrics::counters;
pub use self::tracing::{init_tracing, TracingConfig};
