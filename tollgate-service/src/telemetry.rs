use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVES: &str = "tollgate=debug";

/// Install the global subscriber.
///
/// Fails if one is already installed, which callers embedding the engine
/// in a larger process can ignore.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_DIRECTIVES.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
