//! Chat command handling.

use std::sync::Arc;
use tracing::{info, warn};
use watch_core::error::TransportError;
use watch_core::traits::{Transport, TransportDelivery};
use watch_core::types::{InboundMessage, OutboundMessage, RecipientId, ReplyKeyboard};

use crate::registry::SubscriberRegistry;

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Unknown(String),
}

impl Command {
    /// Parse raw message text.
    ///
    /// Matching ignores case and surrounding whitespace, and accepts the
    /// slash form with an optional bot mention (`/start@SomeBot`).
    pub fn parse(text: &str) -> Self {
        match normalize(text).as_str() {
            "start" => Command::Start,
            "stop" => Command::Stop,
            _ => Command::Unknown(text.to_string()),
        }
    }
}

fn normalize(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix('/').unwrap_or(text);
    let text = match text.split_once('@') {
        Some((command, _bot)) => command,
        None => text,
    };
    text.trim().to_lowercase()
}

/// Applies start/stop commands to the registry and builds the reply.
pub struct CommandHandler {
    registry: Arc<SubscriberRegistry>,
    transport: Arc<dyn Transport>,
}

impl CommandHandler {
    pub fn new(registry: Arc<SubscriberRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self { registry, transport }
    }

    /// Apply the command in `inbound` and return the reply for its sender.
    pub fn handle(&self, inbound: &InboundMessage) -> OutboundMessage {
        let id = inbound.recipient;
        let command = Command::parse(&inbound.text);
        info!("Received {:?} from {}", command, id);

        match command {
            Command::Start => {
                let delivery = Arc::new(TransportDelivery::new(Arc::clone(&self.transport), id));
                if self.registry.add(id, delivery) {
                    info!("Subscribed {} ({} total)", id, self.registry.len());
                    reply(format!("Subscribing... (Chat: {})", id), ["Stop"])
                } else {
                    reply(format!("Already activated this chat ({}).", id), ["Stop"])
                }
            }
            Command::Stop => {
                if self.registry.remove(id) {
                    info!("Unsubscribed {} ({} total)", id, self.registry.len());
                    reply(format!("Unsubscribed you. (Chat: {})", id), ["Start"])
                } else {
                    reply(
                        format!(
                            "Couldn't unsubscribe you. You probably aren't subscribed. (Chat: {})",
                            id
                        ),
                        ["Start"],
                    )
                }
            }
            Command::Unknown(text) => reply(format!("Unrecognised command: '{}'", text), ["Start", "Stop"]),
        }
    }

    /// Handle a message and send the reply back over the transport.
    pub async fn respond(&self, inbound: &InboundMessage) -> Result<(), TransportError> {
        let reply = self.handle(inbound);
        self.transport.send(inbound.recipient, &reply).await.map_err(|e| {
            warn!("Reply to {} failed: {}", inbound.recipient, e);
            e
        })
    }

    pub fn is_subscribed(&self, recipient: RecipientId) -> bool {
        self.registry.contains(recipient)
    }
}

fn reply<const N: usize>(text: String, buttons: [&str; N]) -> OutboundMessage {
    OutboundMessage::plain(text).with_keyboard(ReplyKeyboard::row(buttons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MarketEventBus;
    use crate::testing::FakeTransport;

    fn handler() -> (CommandHandler, Arc<SubscriberRegistry>, Arc<FakeTransport>) {
        let registry = Arc::new(SubscriberRegistry::new());
        let transport = Arc::new(FakeTransport::default());
        (CommandHandler::new(registry.clone(), transport.clone()), registry, transport)
    }

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("start"), Command::Start);
        assert_eq!(Command::parse("  STOP \n"), Command::Stop);
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/Stop@MarketWatchBot"), Command::Stop);
        assert_eq!(Command::parse("Hello"), Command::Unknown("Hello".to_string()));
        assert_eq!(Command::parse(""), Command::Unknown(String::new()));
    }

    #[test]
    fn test_start_start_stop_stop() {
        let (handler, registry, _) = handler();
        let from = |text: &str| InboundMessage::new(42, text);

        let first = handler.handle(&from("start"));
        assert_eq!(first.text, "Subscribing... (Chat: 42)");
        assert_eq!(first.keyboard.unwrap().buttons, vec!["Stop"]);
        assert_eq!(registry.len(), 1);

        assert_eq!(handler.handle(&from("start")).text, "Already activated this chat (42).");
        assert_eq!(registry.len(), 1);

        let stopped = handler.handle(&from("stop"));
        assert_eq!(stopped.text, "Unsubscribed you. (Chat: 42)");
        assert_eq!(stopped.keyboard.unwrap().buttons, vec!["Start"]);
        assert!(registry.is_empty());

        assert_eq!(
            handler.handle(&from("stop")).text,
            "Couldn't unsubscribe you. You probably aren't subscribed. (Chat: 42)"
        );
        assert!(!handler.is_subscribed(RecipientId(42)));
    }

    #[test]
    fn test_unknown_command_keeps_raw_text() {
        let (handler, registry, _) = handler();
        let reply = handler.handle(&InboundMessage::new(7, " Hello there"));

        assert_eq!(reply.text, "Unrecognised command: ' Hello there'");
        assert_eq!(reply.keyboard.unwrap().buttons, vec!["Start", "Stop"]);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_subscribed_chat_receives_publishes() {
        let (handler, registry, transport) = handler();
        handler.respond(&InboundMessage::new(5, "/start")).await.unwrap();

        let report = MarketEventBus::new(registry).broadcast(OutboundMessage::plain("update")).await;

        assert_eq!(report.delivered, 1);
        assert_eq!(transport.sent_to(RecipientId(5)), vec!["Subscribing... (Chat: 5)", "update"]);
    }

    #[tokio::test]
    async fn test_respond_reports_send_failure() {
        let (handler, registry, transport) = handler();
        transport.fail_for.lock().unwrap().push(RecipientId(9));

        assert!(handler.respond(&InboundMessage::new(9, "start")).await.is_err());
        assert!(registry.contains(RecipientId(9)));
    }
}
