use serde::Deserialize;
use serde_json::Value;

/// Outer envelope of an inbound frame. The payload stays an untyped `Value`
/// until the kind is known, so a bad payload never reads as a bad envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Payload of an inbound `typing` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct TypingPayload {
    pub conversation_id: String,
    pub is_typing: bool,
}

/// Payload of an inbound `message` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub conversation_id: String,
    pub body: String,
}

/// Payload of an inbound `read` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadPayload {
    pub conversation_id: String,
}

/// One decoded inbound frame.
///
/// Decode failures are part of the protocol rather than Rust errors: a frame
/// whose envelope does not parse is [`Inbound::Malformed`] and earns the
/// sender an error reply, a recognized kind whose payload does not parse is
/// [`Inbound::Skip`] and is dropped without a reply, and a kind nobody knows
/// is [`Inbound::Unknown`].
#[derive(Debug)]
pub enum Inbound {
    Typing(TypingPayload),
    Message(MessagePayload),
    Read(ReadPayload),
    /// Envelope parsed but named a kind the hub does not handle.
    Unknown(String),
    /// Frame did not parse as a `{"type", "data"}` envelope at all.
    Malformed,
    /// Known kind carrying an undecodable payload.
    Skip,
}

impl Inbound {
    /// Decodes the raw text of one WebSocket frame.
    pub fn decode(raw: &str) -> Inbound {
        let envelope: Envelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(_) => return Inbound::Malformed,
        };

        match envelope.kind.as_str() {
            "typing" => match serde_json::from_value(envelope.data) {
                Ok(payload) => Inbound::Typing(payload),
                Err(_) => Inbound::Skip,
            },
            "message" => match serde_json::from_value(envelope.data) {
                Ok(payload) => Inbound::Message(payload),
                Err(_) => Inbound::Skip,
            },
            "read" => match serde_json::from_value(envelope.data) {
                Ok(payload) => Inbound::Read(payload),
                Err(_) => Inbound::Skip,
            },
            _ => Inbound::Unknown(envelope.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_known_kind() {
        let typing =
            Inbound::decode(r#"{"type":"typing","data":{"conversation_id":"c1","is_typing":true}}"#);
        match typing {
            Inbound::Typing(payload) => {
                assert_eq!(payload.conversation_id, "c1");
                assert!(payload.is_typing);
            }
            other => panic!("expected typing, got {:?}", other),
        }

        let message =
            Inbound::decode(r#"{"type":"message","data":{"conversation_id":"c1","body":"hi"}}"#);
        match message {
            Inbound::Message(payload) => {
                assert_eq!(payload.conversation_id, "c1");
                assert_eq!(payload.body, "hi");
            }
            other => panic!("expected message, got {:?}", other),
        }

        let read = Inbound::decode(r#"{"type":"read","data":{"conversation_id":"c1"}}"#);
        match read {
            Inbound::Read(payload) => assert_eq!(payload.conversation_id, "c1"),
            other => panic!("expected read, got {:?}", other),
        }
    }

    #[test]
    fn unreadable_envelope_is_malformed() {
        assert!(matches!(Inbound::decode("{not json"), Inbound::Malformed));
        assert!(matches!(Inbound::decode(""), Inbound::Malformed));
        // Valid JSON that is not a {"type", "data"} object
        assert!(matches!(Inbound::decode("[1,2,3]"), Inbound::Malformed));
        assert!(matches!(Inbound::decode(r#"{"data":{}}"#), Inbound::Malformed));
        assert!(matches!(Inbound::decode(r#"{"type":5,"data":{}}"#), Inbound::Malformed));
    }

    #[test]
    fn unknown_kind_is_surfaced_by_name() {
        match Inbound::decode(r#"{"type":"frobnicate","data":{}}"#) {
            Inbound::Unknown(kind) => assert_eq!(kind, "frobnicate"),
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn known_kind_with_bad_payload_is_skipped() {
        let wrong_type = Inbound::decode(
            r#"{"type":"typing","data":{"conversation_id":"c1","is_typing":"yes"}}"#,
        );
        assert!(matches!(wrong_type, Inbound::Skip));

        let missing_field = Inbound::decode(r#"{"type":"message","data":{"body":"hi"}}"#);
        assert!(matches!(missing_field, Inbound::Skip));

        let scalar_payload = Inbound::decode(r#"{"type":"read","data":5}"#);
        assert!(matches!(scalar_payload, Inbound::Skip));
    }

    #[test]
    fn missing_data_on_known_kind_is_skipped() {
        assert!(matches!(Inbound::decode(r#"{"type":"read"}"#), Inbound::Skip));
    }
}
