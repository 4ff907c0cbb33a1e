use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a service request.
///
/// The store hands out integers today, but nothing on the client depends on
/// that, so both JSON numbers and strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequestId {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawRequestId::deserialize(deserializer)? {
            RawRequestId::Int(value) => RequestId::from(value),
            RawRequestId::Text(value) => RequestId(value),
        })
    }
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Canonical two-state classification of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestStatus {
    #[default]
    Open,
    Serviced,
}

impl RequestStatus {
    /// Maps raw status text to its classification.
    ///
    /// "resolved" is the older name for "serviced"; records stored under
    /// either word are done. Anything else, including no status at all,
    /// is still open.
    pub fn normalize(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or_default().trim().to_lowercase();
        match normalized.as_str() {
            "serviced" | "resolved" => Self::Serviced,
            _ => Self::Open,
        }
    }

    pub fn is_serviced(self) -> bool {
        self == Self::Serviced
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Serviced => "Serviced",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::normalize(raw.as_deref()))
    }
}

impl Serialize for RequestStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Which collection the feed is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedSource {
    /// Requests owned by the signed-in receiver.
    #[default]
    Receiver,
    /// Open requests inside a provider's service area; `history` also
    /// includes serviced ones.
    Provider { history: bool },
}

impl FeedSource {
    pub fn path_segments(self) -> &'static [&'static str] {
        match self {
            Self::Receiver => &["api", "requests"],
            Self::Provider { .. } => &["api", "provider", "requests"],
        }
    }

    pub fn query(self) -> Option<&'static str> {
        match self {
            Self::Provider { history: true } => Some("history=1"),
            _ => None,
        }
    }
}
