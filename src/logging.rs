use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::{filter::Directive, prelude::*, registry::LookupSpan, EnvFilter, Layer};

/// A boxed tracing [Layer].
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Installs the global subscriber. A subscriber that is already installed
/// wins, so calling this twice is harmless.
pub fn init(directive: Directive) {
    let _ = tracing_subscriber::registry()
        .with(stdout(directive, std::io::stdout().is_terminal()))
        .try_init();
}

/// Stdout layer filtered by `default_directive` unless `RUST_LOG` is set.
///
/// `LOG_TARGET=0` hides event targets.
pub fn stdout<S>(default_directive: Directive, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let with_target = std::env::var("LOG_TARGET")
        .map(|val| val != "0")
        .unwrap_or(true);

    tracing_subscriber::fmt::layer()
        .with_ansi(ansi)
        .with_target(with_target)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(default_directive)
                .from_env_lossy(),
        )
        .boxed()
}
