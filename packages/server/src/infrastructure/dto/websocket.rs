//! WebSocket message DTOs.
//!
//! Both directions use the same compact JSON object:
//!
//! ```text
//! {"sender":"alice","text":"hi"}
//! ```

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, Visitor},
};

/// Wire representation of a relayed message.
///
/// Decoding is lenient: keys match regardless of ASCII case, missing keys and
/// `null` values leave the field empty, and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDto {
    pub sender: String,
    pub text: String,
}

impl MessageDto {
    /// Decode a frame payload (text or binary) into a message.
    ///
    /// Only the first JSON value is read; anything after it is ignored.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::Deserializer::from_slice(payload)
            .into_iter::<Self>()
            .next()
            .unwrap_or_else(|| Err(de::Error::custom("empty payload")))
    }

    /// Encode as compact JSON
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'de> Deserialize<'de> for MessageDto {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MessageDtoVisitor)
    }
}

struct MessageDtoVisitor;

impl<'de> Visitor<'de> for MessageDtoVisitor {
    type Value = MessageDto;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a message object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut dto = MessageDto::default();
        while let Some(key) = map.next_key::<String>()? {
            // Later duplicates win
            if key.eq_ignore_ascii_case("sender") {
                if let Some(sender) = map.next_value::<Option<String>>()? {
                    dto.sender = sender;
                }
            } else if key.eq_ignore_ascii_case("text") {
                if let Some(text) = map.next_value::<Option<String>>()? {
                    dto.text = text;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(dto)
    }
}
