//! Byte units accepted by the `unit` option.

use crate::error::HostError;
use std::str::FromStr;

/// A power-of-1024 byte unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteUnit {
    /// Bytes.
    B,
    /// Kibibytes.
    Kb,
    /// Mebibytes.
    Mb,
    /// Gibibytes.
    Gb,
    /// Tebibytes.
    Tb,
}

impl ByteUnit {
    fn exponent(self) -> u32 {
        match self {
            ByteUnit::B => 0,
            ByteUnit::Kb => 1,
            ByteUnit::Mb => 2,
            ByteUnit::Gb => 3,
            ByteUnit::Tb => 4,
        }
    }

    /// Converts a byte count, truncating.
    #[must_use]
    pub fn from_bytes(self, bytes: u64) -> u64 {
        bytes / 1024u64.pow(self.exponent())
    }
}

impl FromStr for ByteUnit {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" => Ok(ByteUnit::B),
            "kb" | "k" => Ok(ByteUnit::Kb),
            "mb" | "m" => Ok(ByteUnit::Mb),
            "gb" | "g" => Ok(ByteUnit::Gb),
            "tb" | "t" => Ok(ByteUnit::Tb),
            _ => Err(HostError::UnknownUnit(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("KB".parse::<ByteUnit>().unwrap(), ByteUnit::Kb);
        assert_eq!("gb".parse::<ByteUnit>().unwrap(), ByteUnit::Gb);
        assert_eq!(" m ".parse::<ByteUnit>().unwrap(), ByteUnit::Mb);
    }

    #[test]
    fn test_unknown_unit() {
        assert!(matches!("pb".parse::<ByteUnit>(), Err(HostError::UnknownUnit(u)) if u == "pb"));
        assert!("".parse::<ByteUnit>().is_err());
    }

    #[test]
    fn test_conversion_truncates() {
        assert_eq!(ByteUnit::B.from_bytes(1500), 1500);
        assert_eq!(ByteUnit::Kb.from_bytes(1500), 1);
        assert_eq!(ByteUnit::Mb.from_bytes(5 * 1024 * 1024 + 1), 5);
        assert_eq!(ByteUnit::Gb.from_bytes(1024 * 1024 * 1024 - 1), 0);
        assert_eq!(ByteUnit::Tb.from_bytes(2 * 1024u64.pow(4)), 2);
    }
}
