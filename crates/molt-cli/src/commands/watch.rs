//! Continuous feed watch
//!
//! Ctrl-C is caught on a dedicated thread. The first one sets the cancel
//! flag, which the watcher notices between polls or while sleeping. A
//! second one exits at once, even mid-request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use molt_core::FeedWatcher;

use crate::commands::Context;
use crate::output::{post_line, OutputFormat};

const WATCH_SORT: &str = "new";

pub fn watch(ctx: &Context, interval_secs: u64, limit: u32) -> Result<()> {
    let client = ctx.client()?;
    let mut cache = ctx.cache();

    let cancel = Arc::new(AtomicBool::new(false));
    spawn_interrupt_listener(Arc::clone(&cancel))?;

    if ctx.output.format == OutputFormat::Human {
        println!(
            "Watching the {} newest posts every {}s. Ctrl-C to stop.",
            limit, interval_secs
        );
    }

    let mut watcher = FeedWatcher::new(WATCH_SORT, limit);
    watcher.run(
        &client,
        &mut cache,
        Duration::from_secs(interval_secs.max(1)),
        &cancel,
        |posts| match ctx.output.format {
            OutputFormat::Human => {
                for post in posts {
                    println!("{}", post_line(post));
                }
            }
            OutputFormat::Json => {
                for post in posts {
                    match serde_json::to_string(post) {
                        Ok(line) => println!("{}", line),
                        Err(e) => warn!("failed to encode post: {}", e),
                    }
                }
            }
            OutputFormat::Quiet => {
                for post in posts {
                    println!("{}", post.id);
                }
            }
        },
    );

    ctx.output.message(&format!("Stopped after seeing {} posts.", watcher.seen_count()));
    Ok(())
}

/// Exit status for an interrupted process (128 + SIGINT)
const INTERRUPTED_EXIT: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    /// First Ctrl-C: finish the current poll, then stop
    Stop,
    /// Ctrl-C while already stopping: leave now
    ForceExit,
}

fn on_interrupt(cancel: &AtomicBool) -> Interrupt {
    if cancel.swap(true, Ordering::SeqCst) {
        Interrupt::ForceExit
    } else {
        Interrupt::Stop
    }
}

/// Set `cancel` on the first Ctrl-C and exit on the second
fn spawn_interrupt_listener(cancel: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .context("Failed to start signal handler")?;

    thread::Builder::new()
        .name("molt-ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("failed to listen for Ctrl-C: {}", e);
                        return;
                    }
                    match on_interrupt(&cancel) {
                        Interrupt::Stop => {
                            debug!("interrupt received");
                            eprintln!("Stopping after the current poll. Ctrl-C again to quit now.");
                        }
                        Interrupt::ForceExit => std::process::exit(INTERRUPTED_EXIT),
                    }
                }
            });
        })
        .context("Failed to start signal handler")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_stops_second_exits() {
        let cancel = AtomicBool::new(false);

        assert_eq!(on_interrupt(&cancel), Interrupt::Stop);
        assert!(cancel.load(Ordering::SeqCst));
        assert_eq!(on_interrupt(&cancel), Interrupt::ForceExit);
    }
}
