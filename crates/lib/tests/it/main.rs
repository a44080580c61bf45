/*! Integration tests for fracindex.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - engine: End-to-end move/rebalance/relocate scenarios against InMemory
 * - store: Store trait contract checks and snapshot persistence
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("fracindex=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod engine;
mod helpers;
