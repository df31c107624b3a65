//! Console transport for dry runs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;
use watch_core::error::TransportError;
use watch_core::traits::Transport;
use watch_core::types::{InboundMessage, OutboundMessage, RecipientId};

/// Prints outgoing messages and reads commands from stdin.
///
/// Every stdin line is treated as a message from a single local recipient.
pub struct ConsoleTransport {
    local: RecipientId,
    lines: Mutex<Lines<BufReader<Stdin>>>,
    eof: AtomicBool,
}

impl ConsoleTransport {
    pub fn new(local: RecipientId) -> Self {
        Self {
            local,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            eof: AtomicBool::new(false),
        }
    }

    pub fn local_recipient(&self) -> RecipientId {
        self.local
    }

    fn render(recipient: RecipientId, message: &OutboundMessage) -> String {
        let mut out = format!("── to {} ──\n{}", recipient, message.text);
        if let Some(keyboard) = &message.keyboard {
            out.push_str(&format!("\n[{}]", keyboard.buttons.join("] [")));
        }
        out
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new(RecipientId(0))
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn send(&self, recipient: RecipientId, message: &OutboundMessage) -> Result<(), TransportError> {
        info!("Dry run delivery to {}", recipient);
        println!("{}", Self::render(recipient, message));
        Ok(())
    }

    async fn receive(&self, timeout: Duration) -> Result<Vec<InboundMessage>, TransportError> {
        if self.eof.load(Ordering::SeqCst) {
            tokio::time::sleep(timeout).await;
            return Ok(vec![]);
        }

        let mut lines = self.lines.lock().await;
        match tokio::time::timeout(timeout, lines.next_line()).await {
            Ok(Ok(Some(line))) => Ok(vec![InboundMessage::new(self.local, line)]),
            Ok(Ok(None)) => {
                self.eof.store(true, Ordering::SeqCst);
                Ok(vec![])
            }
            Ok(Err(e)) => Err(TransportError::Connection(e.to_string())),
            Err(_) => Ok(vec![]),
        }
    }

    async fn identity(&self) -> Result<String, TransportError> {
        Ok("console".to_string())
    }

    fn name(&self) -> &str {
        "Console"
    }
}
