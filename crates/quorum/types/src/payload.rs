use serde::{Deserialize, Serialize};

/// Opaque destination identifier for a proposed transaction, an account or
/// contract equivalent. The engine never interprets it; only the effect
/// executor does.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dst:{}", self.0)
    }
}

/// Call data carried by a proposed transaction.
///
/// Typed variants replace the stringly-typed call fragments the engine's
/// consumers used to resolve at runtime; raw bytes remain supported only for
/// opaque pass-through calls the executor forwards untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPayload {
    /// Plain value transfer, no call data.
    Empty,
    /// Statically-shaped invocation of a named method on the target.
    Invoke {
        method: String,
        args: serde_json::Value,
    },
    /// Opaque bytes forwarded to the target as-is.
    Raw(Vec<u8>),
}

impl CallPayload {
    pub fn is_empty(&self) -> bool {
        matches!(self, CallPayload::Empty)
    }

    pub fn invoke(method: impl Into<String>, args: serde_json::Value) -> Self {
        CallPayload::Invoke {
            method: method.into(),
            args,
        }
    }
}

impl Default for CallPayload {
    fn default() -> Self {
        CallPayload::Empty
    }
}
