pub mod config;
pub mod habit;
pub mod timeline;
pub mod urge;

use breakloop_core::EventBus;

/// Event bus wired with the CLI's one subscriber: a debug log of every
/// store change. A GUI shell would hang its view refresh here instead.
pub(crate) fn change_bus() -> EventBus {
    let mut bus = EventBus::new();
    bus.subscribe(|event| tracing::debug!(?event, "store changed"));
    bus
}
