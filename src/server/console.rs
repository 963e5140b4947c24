//! Console update source
//!
//! Translates operator input into transport updates. Every line is
//! attributed to the allowed principal in a direct conversation.
//!
//! ```text
//! /files 2                      text command
//! cb getfolder:d:photos         button press
//! video clips/a.mp4 Trip.mp4    media arriving (file id is a path in the inbox)
//! photo a.jpg + document b.pdf  several items in one message
//! ```

use uuid::Uuid;

use crate::transport::{ChatId, ChatKind, MediaItem, MediaKind, Payload, Update, UpdateContext};

/// Separates the items of a multi-item message
const ITEM_SEPARATOR: &str = " + ";

pub fn parse_console_line(line: &str, principal: i64) -> Option<Update> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let payload = if line.starts_with('/') {
        Payload::Text(line.to_string())
    } else if let Some(data) = line.strip_prefix("cb ") {
        Payload::Callback(data.trim().to_string())
    } else {
        match parse_media(line) {
            Some(items) => Payload::Media(items),
            None => Payload::Text(line.to_string()),
        }
    };

    Some(Update {
        context: UpdateContext {
            sender_id: Some(principal),
            chat_id: ChatId(principal),
            chat_kind: ChatKind::Direct,
        },
        payload,
    })
}

fn parse_media(line: &str) -> Option<Vec<MediaItem>> {
    line.split(ITEM_SEPARATOR).map(parse_media_item).collect()
}

fn parse_media_item(item: &str) -> Option<MediaItem> {
    let mut parts = item.trim().splitn(3, char::is_whitespace);
    let kind = MediaKind::from_tag(parts.next()?)?;
    let file_id = parts.next()?.to_string();
    let file_name = parts
        .next()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Some(MediaItem {
        kind,
        file_id,
        unique_id: Uuid::new_v4().simple().to_string()[..12].to_string(),
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_callbacks() {
        let update = parse_console_line("/files 2", 9).unwrap();
        assert!(matches!(update.payload, Payload::Text(ref t) if t == "/files 2"));
        assert_eq!(update.context.sender_id, Some(9));
        assert_eq!(update.context.chat_kind, ChatKind::Direct);

        let update = parse_console_line("cb files:1", 9).unwrap();
        assert!(matches!(update.payload, Payload::Callback(ref d) if d == "files:1"));

        assert!(parse_console_line("   ", 9).is_none());
    }

    #[test]
    fn media_items_in_order() {
        let update = parse_console_line("photo a.jpg + document docs/b.pdf Final Report.pdf", 9).unwrap();
        let Payload::Media(items) = update.payload else {
            panic!("expected media");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, MediaKind::Photo);
        assert_eq!(items[1].file_id, "docs/b.pdf");
        assert_eq!(items[1].suggested_name(), Some("Final Report.pdf"));
        assert_eq!(items[0].unique_id.len(), 12);
    }

    #[test]
    fn unknown_words_are_plain_text() {
        let update = parse_console_line("hello there", 9).unwrap();
        assert!(matches!(update.payload, Payload::Text(_)));
    }
}
