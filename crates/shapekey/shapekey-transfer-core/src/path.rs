//! ChannelPath parsing and formatting.
//!
//! Drivers address a channel's weight through a host data path:
//!   key_blocks["<name>"].value
//! - the name is double-quoted; `"` and `\` inside it are backslash-escaped
//! - only the `.value` field addresses the weight; any other path is rejected
//!
//! Examples:
//!   key_blocks["Smile"].value      -> name="Smile"
//!   key_blocks["Say \"Ah\""].value -> name=`Say "Ah"`

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "key_blocks[\"";
const SUFFIX: &str = "\"].value";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelPath {
    name: String,
}

impl ChannelPath {
    /// Path addressing the weight of channel `name`.
    pub fn weight(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the channel whose weight this path addresses.
    pub fn channel_name(&self) -> &str {
        &self.name
    }

    /// Parse a data path according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty path".to_string());
        }
        let inner = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| format!("not a channel path: {s}"))?;
        let inner = inner
            .strip_suffix(SUFFIX)
            .ok_or_else(|| format!("path does not address a channel weight: {s}"))?;

        let mut name = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(esc @ ('"' | '\\')) => name.push(esc),
                    Some(other) => return Err(format!("invalid escape '\\{other}' in {s}")),
                    None => return Err(format!("dangling escape in {s}")),
                },
                '"' => return Err(format!("unescaped quote in channel name: {s}")),
                c => name.push(c),
            }
        }
        if name.is_empty() {
            return Err("empty channel name".to_string());
        }
        Ok(ChannelPath { name })
    }

    /// True when `path` is the weight path of channel `name`.
    pub fn addresses(path: &str, name: &str) -> bool {
        ChannelPath::parse(path).is_ok_and(|p| p.name == name)
    }
}

impl fmt::Display for ChannelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for c in self.name.chars() {
            if c == '"' || c == '\\' {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(SUFFIX)
    }
}

impl FromStr for ChannelPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelPath::parse(s)
    }
}

impl Serialize for ChannelPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChannelPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ChannelPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_host_weight_path() {
        assert_eq!(
            ChannelPath::weight("Smile").to_string(),
            "key_blocks[\"Smile\"].value"
        );
    }

    #[test]
    fn parse_recovers_escaped_names() {
        let p = ChannelPath::weight("Say \"Ah\" \\ wide");
        let parsed = ChannelPath::parse(&p.to_string()).unwrap();
        assert_eq!(parsed.channel_name(), "Say \"Ah\" \\ wide");
    }

    #[test]
    fn rejects_non_weight_paths() {
        assert!(ChannelPath::parse("").is_err());
        assert!(ChannelPath::parse("key_blocks[\"Smile\"].slider_max").is_err());
        assert!(ChannelPath::parse("location").is_err());
        assert!(ChannelPath::parse("key_blocks[\"\"].value").is_err());
        assert!(ChannelPath::parse("key_blocks[\"a\"b\"].value").is_err());
    }

    #[test]
    fn addresses_matches_exact_name_only() {
        let path = ChannelPath::weight("Blink").to_string();
        assert!(ChannelPath::addresses(&path, "Blink"));
        assert!(!ChannelPath::addresses(&path, "Blink_L"));
    }

    #[test]
    fn serde_roundtrips_as_string() {
        let json = serde_json::to_string(&ChannelPath::weight("Jaw")).unwrap();
        assert_eq!(json, r#""key_blocks[\"Jaw\"].value""#);
        let back: ChannelPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back.channel_name(), "Jaw");
    }
}
