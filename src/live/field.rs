use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// The closed set of now-playing fields the server may push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    Title,
    Subtitle,
    Author,
    Listeners,
    BackgroundUrl,
    SourceUrl,
}

impl DisplayField {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "title" => Self::Title,
            "subtitle" => Self::Subtitle,
            "author" => Self::Author,
            "listeners" => Self::Listeners,
            "background_url" => Self::BackgroundUrl,
            "source_url" => Self::SourceUrl,
            _ => return None,
        })
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Author => "author",
            Self::Listeners => "listeners",
            Self::BackgroundUrl => "background_url",
            Self::SourceUrl => "source_url",
        }
    }
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One typed field update. `None` is an explicit `null` from the server
/// and means "clear"; fields missing from a message never produce an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Title(Option<String>),
    Subtitle(Option<String>),
    Author(Option<String>),
    Listeners(u64),
    BackgroundUrl(Option<String>),
    SourceUrl(Option<String>),
}

impl DisplayUpdate {
    pub fn field(&self) -> DisplayField {
        match self {
            Self::Title(_) => DisplayField::Title,
            Self::Subtitle(_) => DisplayField::Subtitle,
            Self::Author(_) => DisplayField::Author,
            Self::Listeners(_) => DisplayField::Listeners,
            Self::BackgroundUrl(_) => DisplayField::BackgroundUrl,
            Self::SourceUrl(_) => DisplayField::SourceUrl,
        }
    }

    fn from_entry(field: DisplayField, value: &Value) -> Option<Self> {
        Some(match field {
            DisplayField::Title => Self::Title(nullable_string(value)?),
            DisplayField::Subtitle => Self::Subtitle(nullable_string(value)?),
            DisplayField::Author => Self::Author(nullable_string(value)?),
            DisplayField::Listeners => Self::Listeners(listener_count(value)?),
            DisplayField::BackgroundUrl => Self::BackgroundUrl(nullable_string(value)?),
            DisplayField::SourceUrl => Self::SourceUrl(nullable_string(value)?),
        })
    }
}

// Accepts integral floats such as `1500.0` as well as plain integers.
fn listener_count(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    let count = value.as_f64()?;
    if count >= 0.0 && count.fract() == 0.0 && count < u64::MAX as f64 {
        Some(count as u64)
    } else {
        None
    }
}

// Outer `None`: wrong type. Inner `None`: explicit null.
fn nullable_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

/// Decode one event-stream payload into updates, in payload order.
///
/// Anything that is not a JSON object decodes as an empty object. Unknown
/// keys and mistyped values are skipped one by one.
pub fn decode(payload: &str) -> Vec<DisplayUpdate> {
    let object = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) => {
            if !payload.trim().is_empty() {
                debug!("ignoring non-object event payload");
            }
            Map::new()
        }
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let Some(field) = DisplayField::from_key(key) else {
                debug!(key = %key, "ignoring unknown display field");
                return None;
            };
            let update = DisplayUpdate::from_entry(field, value);
            if update.is_none() {
                debug!(field = %field, "ignoring mistyped display field");
            }
            update
        })
        .collect()
}
