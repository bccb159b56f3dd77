//! Logger setup shared by every Sketchroom binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise the binary's own crate logs at
/// `default_level` and `tower_http` request traces are logged at debug.
///
/// # Arguments
///
/// * `bin_name` - Binary name, usually `env!("CARGO_BIN_NAME")`
/// * `default_level` - Level used when `RUST_LOG` is absent (e.g. `"info"`)
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // A second initialization (e.g. from tests) is not an error worth failing on
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!("{crate_name}={default_level},tower_http=debug")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_uses_crate_name() {
        // テスト項目: バイナリ名のハイフンがクレート名のアンダースコアに変換される
        // when (操作):
        let directives = default_directives("sketchroom-server", "info");

        // then (期待する結果):
        assert_eq!(directives, "sketchroom_server=info,tower_http=debug");
    }
}
