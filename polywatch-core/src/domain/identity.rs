use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque trader identity (wallet address, user id, or numeric key).
///
/// The canonical form is the string representation; two identities that
/// render to the same string are the same trader and seed the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Canonical string form used for hashing.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short label for display: `0x` addresses collapse to `0x1234...abcd`.
    pub fn display_name(&self) -> String {
        shorten_address(&self.0)
    }
}

/// Collapse long `0x` addresses to their first six and last four characters.
///
/// Anything else (user names, short ids) is returned unchanged.
pub fn shorten_address(raw: &str) -> String {
    if raw.starts_with("0x") && raw.len() > 10 && raw.is_ascii() {
        format!("{}...{}", &raw[..6], &raw[raw.len() - 4..])
    } else {
        raw.to_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for Identity {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

macro_rules! identity_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Identity {
                fn from(n: $t) -> Self {
                    Self(n.to_string())
                }
            }
        )*
    };
}

identity_from_int!(u32, u64, i32, i64, usize);
