//! Conversation message types.
//!
//! A `Message` is what the chat widget displays. Only `id`, `role` and
//! `content` are meaningful to the session core; everything else the widget
//! attaches (timestamps, render metadata) is carried through untouched in
//! `extra`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Represents the role of a message in a conversation.
///
/// Roles the widget may invent beyond the three known ones are kept verbatim
/// in `Other` so that a load/persist cycle never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
    /// Any other role string.
    Other(String),
}

impl MessageRole {
    pub fn as_str(&self) -> &str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
            MessageRole::Other(role) => role,
        }
    }
}

impl From<String> for MessageRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            "system" => MessageRole::System,
            _ => MessageRole::Other(role),
        }
    }
}

impl From<MessageRole> for String {
    fn from(role: MessageRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single displayed chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    /// Display metadata opaque to the core (e.g. `createAt`, `updateAt`).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    pub fn new(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Attaches an opaque metadata field.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Ordered mapping from message id to message.
///
/// Iteration order is insertion order, which is the chronological display
/// order. On the wire this is a JSON object whose key order is preserved in
/// both directions. Inserting an existing id replaces the message in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageMap {
    entries: Vec<(String, Message)>,
}

impl MessageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, message)| message)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Inserts a message under `id`, returning the replaced message if the id
    /// was already present.
    pub fn insert(&mut self, id: impl Into<String>, message: Message) -> Option<Message> {
        let id = id.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(key, _)| *key == id) {
            return Some(std::mem::replace(slot, message));
        }
        self.entries.push((id, message));
        None
    }

    /// Appends a message keyed by its own id.
    pub fn push(&mut self, message: Message) -> Option<Message> {
        let id = message.id.clone();
        self.insert(id, message)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.entries.iter().map(|(id, message)| (id.as_str(), message))
    }

    pub fn values(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().map(|(_, message)| message)
    }

    /// Messages in display order, oldest first.
    pub fn to_ordered_vec(&self) -> Vec<Message> {
        self.values().cloned().collect()
    }
}

impl FromIterator<Message> for MessageMap {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut map = MessageMap::new();
        for message in iter {
            map.push(message);
        }
        map
    }
}

impl Serialize for MessageMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, message) in &self.entries {
            map.serialize_entry(id, message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MessageMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MessageMapVisitor;

        impl<'de> Visitor<'de> for MessageMapVisitor {
            type Value = MessageMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of message id to message")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MessageMap, A::Error> {
                let mut map = MessageMap::new();
                while let Some((id, message)) = access.next_entry::<String, Message>()? {
                    map.insert(id, message);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MessageMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_role_survives_roundtrip() {
        let value = json!({"id": "m1", "role": "tool", "content": "x"});
        let message: Message = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(message.role, MessageRole::Other("tool".to_string()));
        assert_eq!(serde_json::to_value(&message).unwrap(), value);
    }

    #[test]
    fn test_opaque_metadata_is_preserved() {
        let value = json!({
            "id": "m1",
            "role": "user",
            "content": "hello",
            "createAt": 1700000000000u64,
            "meta": {"avatar": "me"}
        });
        let message: Message = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(message.extra.len(), 2);
        assert_eq!(serde_json::to_value(&message).unwrap(), value);
    }

    #[test]
    fn test_map_keeps_document_order() {
        let raw = r#"{
            "zeta": {"id": "zeta", "role": "user", "content": "first"},
            "alpha": {"id": "alpha", "role": "assistant", "content": "second"},
            "mid": {"id": "mid", "role": "user", "content": "third"}
        }"#;
        let map: MessageMap = serde_json::from_str(raw).unwrap();
        let contents: Vec<&str> = map.values().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);

        let written = serde_json::to_string(&map).unwrap();
        let zeta = written.find("zeta").unwrap();
        let alpha = written.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_insert_existing_id_replaces_in_place() {
        let mut map = MessageMap::new();
        map.push(Message::new("a", MessageRole::User, "one"));
        map.push(Message::new("b", MessageRole::Assistant, "two"));

        let replaced = map.insert("a", Message::new("a", MessageRole::User, "uno"));

        assert_eq!(replaced.unwrap().content, "one");
        assert_eq!(map.len(), 2);
        assert_eq!(map.values().next().unwrap().content, "uno");
    }
}
