//! Chat events and their JSON wire form.
//!
//! Every frame is a text frame carrying `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};

/// Client → server events. Connect and disconnect are socket lifecycle,
/// not frames, so they have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage { message: String },
    UpdateUsername { username: String },
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UserJoined {
        username: String,
        avatar: String,
    },
    SetUsername {
        username: String,
    },
    UserLeft {
        username: String,
    },
    NewMessage {
        username: String,
        avatar: String,
        message: String,
    },
    UsernameUpdated {
        old_username: String,
        new_username: String,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserJoined { .. } => "user_joined",
            Self::SetUsername { .. } => "set_username",
            Self::UserLeft { .. } => "user_left",
            Self::NewMessage { .. } => "new_message",
            Self::UsernameUpdated { .. } => "username_updated",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ClientEvent {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_message_wire_shape() {
        let event = ServerEvent::NewMessage {
            username: "user_1234".into(),
            avatar: "https://a/boy?username=user_1234".into(),
            message: "hi".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "new_message",
                "data": {
                    "username": "user_1234",
                    "avatar": "https://a/boy?username=user_1234",
                    "message": "hi"
                }
            })
        );
    }

    #[test]
    fn test_username_updated_wire_shape() {
        let event = ServerEvent::UsernameUpdated {
            old_username: "user_1234".into(),
            new_username: "bob".into(),
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["event"], "username_updated");
        assert_eq!(value["data"]["old_username"], "user_1234");
        assert_eq!(value["data"]["new_username"], "bob");
    }

    #[test]
    fn test_name_matches_serialized_tag() {
        let events = [
            ServerEvent::UserJoined { username: "a".into(), avatar: "b".into() },
            ServerEvent::SetUsername { username: "a".into() },
            ServerEvent::UserLeft { username: "a".into() },
        ];
        for event in events {
            let value: serde_json::Value =
                serde_json::from_str(&event.to_json().unwrap()).unwrap();
            assert_eq!(value["event"], event.name());
        }
    }

    #[test]
    fn test_parse_client_events() {
        assert_eq!(
            ClientEvent::from_json(r#"{"event":"send_message","data":{"message":"hello"}}"#)
                .unwrap(),
            ClientEvent::SendMessage { message: "hello".into() }
        );
        assert_eq!(
            ClientEvent::from_json(r#"{"event":"update_username","data":{"username":"bob"}}"#)
                .unwrap(),
            ClientEvent::UpdateUsername { username: "bob".into() }
        );
    }

    #[test]
    fn test_reject_malformed_client_events() {
        assert!(ClientEvent::from_json("not json").is_err());
        assert!(ClientEvent::from_json(r#"{"event":"shout","data":{}}"#).is_err());
        assert!(ClientEvent::from_json(r#"{"event":"send_message","data":{}}"#).is_err());
        assert!(ClientEvent::from_json(r#"{"event":"user_joined","data":{"username":"x","avatar":"y"}}"#).is_err());
    }
}
