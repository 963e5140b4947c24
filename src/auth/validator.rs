//! Access validator
//!
//! Both checks must pass before any relay operation runs. Rejected updates
//! are dropped without a reply.

use crate::config::RelayConfig;
use crate::transport::{ChatKind, UpdateContext};

/// Whether the sender is the configured principal
pub fn is_authorized_principal(config: &RelayConfig, sender_id: Option<i64>) -> bool {
    sender_id.is_some_and(|id| id == config.allowed_user_id)
}

/// Whether the update comes from a one-to-one conversation
pub fn is_direct_session(context: &UpdateContext) -> bool {
    context.chat_kind == ChatKind::Direct
}

pub fn is_permitted(config: &RelayConfig, context: &UpdateContext) -> bool {
    is_authorized_principal(config, context.sender_id) && is_direct_session(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChatId;

    fn config() -> RelayConfig {
        RelayConfig {
            bot_token: "t".into(),
            allowed_user_id: 7,
            download_root: "/tmp/d".into(),
            upload_root: "/tmp/u".into(),
            max_send_size_mb: 50,
            page_size: 8,
            folder_send_delay_ms: 0,
            max_reported_failures: 5,
            console_inbox: "./inbox".into(),
            console_outbox: "./outbox".into(),
        }
    }

    fn context(sender_id: Option<i64>, chat_kind: ChatKind) -> UpdateContext {
        UpdateContext {
            sender_id,
            chat_id: ChatId(1),
            chat_kind,
        }
    }

    #[test]
    fn only_the_principal_in_a_direct_chat() {
        let config = config();
        assert!(is_permitted(&config, &context(Some(7), ChatKind::Direct)));
        assert!(!is_permitted(&config, &context(Some(8), ChatKind::Direct)));
        assert!(!is_permitted(&config, &context(None, ChatKind::Direct)));
        assert!(!is_permitted(&config, &context(Some(7), ChatKind::Group)));
        assert!(!is_permitted(&config, &context(Some(7), ChatKind::Channel)));
    }
}
