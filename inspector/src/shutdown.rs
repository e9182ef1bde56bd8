use fbpcore::CancelFlag;
use log::warn;
use std::thread;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

/// Raises `cancel` when the process receives Ctrl+C.
///
/// The listener runs on a detached thread with its own current-thread
/// runtime, so the numeric pipeline stays synchronous.
pub fn cancel_on_ctrl_c(cancel: CancelFlag) {
    thread::spawn(move || {
        let runtime = match TokioBuilder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                warn!("Ctrl+C handler unavailable: {}", err);
                return;
            }
        };
        runtime.block_on(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    warn!("interrupt received, cancelling after the current angle");
                    cancel.cancel();
                }
                Err(err) => warn!("awaiting Ctrl+C failed: {}", err),
            }
        });
    });
}
