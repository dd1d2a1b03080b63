//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when neither the caller nor `RUST_LOG` supplies one.
pub const DEFAULT_LOG_FILTER: &str = "hospital_core=info";

/// Install a global fmt subscriber.
///
/// `filter` overrides `RUST_LOG`. Returns `false` if a subscriber was already
/// installed or the filter did not parse.
pub fn init_logging(filter: Option<&str>) -> bool {
    let env_filter = match filter {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(f) => f,
            Err(_) => return false,
        },
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_filter_rejected() {
        assert!(!init_logging(Some("hospital_core=loudest")));
    }

    #[test]
    fn test_second_init_is_noop() {
        init_logging(Some("warn"));
        assert!(!init_logging(Some("warn")));
    }
}
