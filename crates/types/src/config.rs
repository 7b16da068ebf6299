use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spatial index variant backing a lookup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// R*-tree prefilter followed by exact checks
    #[default]
    RTree,
    /// Full scan over every provider
    Linear,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RTree => "rtree",
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown index name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIndexKind(pub String);

impl fmt::Display for UnknownIndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported spatial index type: {}", self.0)
    }
}

impl std::error::Error for UnknownIndexKind {}

impl FromStr for IndexKind {
    type Err = UnknownIndexKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rtree" | "r_tree" | "r-tree" => Ok(Self::RTree),
            "linear" | "scan" => Ok(Self::Linear),
            _ => Err(UnknownIndexKind(s.to_string())),
        }
    }
}
