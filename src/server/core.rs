//! Console server loop
//!
//! Reads operator lines from stdin and hands each resulting update to the
//! relay on its own task, so a panic while handling one update does not
//! stop the loop.

use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::server::console::parse_console_line;
use crate::session::Relay;

const MAX_LINE_LENGTH: usize = 4096;

pub struct Server {
    relay: Arc<Relay>,
}

impl Server {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }

    /// Reads updates from stdin until it closes, handling them strictly
    /// one at a time.
    pub async fn start(&self) -> std::io::Result<()> {
        let principal = self.relay.config().allowed_user_id;
        info!(
            "Relay ready. Downloads: {}, uploads: {}",
            self.relay.namespace().roots().download().display(),
            self.relay.namespace().roots().upload().display()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.len() > MAX_LINE_LENGTH {
                warn!("Ignoring console line of {} bytes", line.len());
                continue;
            }

            let Some(update) = parse_console_line(&line, principal) else {
                continue;
            };
            let chat = update.context.chat_id;

            // A panic while handling one update must not take the loop down
            let relay = Arc::clone(&self.relay);
            let handle = tokio::spawn(async move { relay.handle_update(update).await });
            if let Err(e) = handle.await {
                error!("Update handler crashed: {}", e);
                self.relay.report_failure(chat).await;
            }
        }

        info!("Console closed, shutting down");
        Ok(())
    }
}
