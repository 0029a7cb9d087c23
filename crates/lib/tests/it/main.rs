/*! Integration tests for the Cardfolio engine.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - session: login lifecycle, persisted restore, expiry
 * - profile: draft editing, dirty tracking, save reconciliation
 * - autosave: the debounce engine under paused tokio time
 * - store: the JSON state file
 * - analytics: report building and degradation
 * - upload: image constraints and the host boundary
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cardfolio=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod analytics;
mod autosave;
mod session;
mod store;
