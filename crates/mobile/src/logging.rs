use std::sync::Once;

use tracing::Metadata;
use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

const CRATE_PREFIX: &str = "branchline";

fn ours() -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    FilterFn::new(|metadata: &Metadata<'_>| {
        metadata
            .module_path()
            .unwrap_or_default()
            .starts_with(CRATE_PREFIX)
    })
}

pub(crate) fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        #[cfg(target_os = "android")]
        if android::setup_logcat() {
            return;
        }

        let layer = tracing_subscriber::fmt::layer()
            .event_format(Format::default().without_time())
            .with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(ours())
            .try_init();
    })
}

#[cfg(target_os = "android")]
mod android {
    use tracing_logcat::{LogcatMakeWriter, LogcatTag};
    use tracing_subscriber::{
        fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
    };

    /// Whether a logcat subscriber was installed.
    pub(super) fn setup_logcat() -> bool {
        let tag = LogcatTag::Fixed("Branchline-Rust".to_owned());
        let Ok(writer) = LogcatMakeWriter::new(tag) else {
            return false;
        };
        let layer = tracing_subscriber::fmt::layer()
            .event_format(Format::default().with_level(false).without_time())
            .with_writer(writer)
            .with_ansi(false);
        tracing_subscriber::registry()
            .with(layer)
            .with(super::ours())
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice() {
        setup_logging();
        setup_logging();
        tracing::debug!("still fine");
    }
}
