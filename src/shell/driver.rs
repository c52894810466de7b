/*!
 * Tick Driver
 * Background task calling `tick()` on a fixed period
 */

use super::SharedDispatcher;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tick the shared dispatcher every `period` until the task is aborted
///
/// Ticks while uninitialized are skipped. The lock is held only for the
/// duration of one `tick()`.
pub fn spawn_ticker(dispatcher: SharedDispatcher, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Some(dispatcher) = dispatcher.lock().as_mut() {
                dispatcher.tick();
            }
        }
    })
}
