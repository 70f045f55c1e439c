//! Commodity models

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Commodities received from suppliers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    #[serde(alias = "cocoa")]
    Cacao,
    #[serde(rename = "cafe", alias = "coffee")]
    Coffee,
    #[serde(rename = "miel", alias = "honey")]
    Honey,
    #[serde(rename = "coco", alias = "coconut")]
    Coconut,
}

impl Commodity {
    pub const ALL: [Commodity; 4] = [
        Commodity::Cacao,
        Commodity::Coffee,
        Commodity::Honey,
        Commodity::Coconut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commodity::Cacao => "cacao",
            Commodity::Coffee => "cafe",
            Commodity::Honey => "miel",
            Commodity::Coconut => "coco",
        }
    }
}

impl std::str::FromStr for Commodity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cacao" | "cocoa" => Ok(Commodity::Cacao),
            "cafe" | "café" | "coffee" => Ok(Commodity::Coffee),
            "miel" | "honey" => Ok(Commodity::Honey),
            "coco" | "coconut" => Ok(Commodity::Coconut),
            _ => Err(EngineError::UnknownCommodity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Commodity::Cacao => write!(f, "Cacao"),
            Commodity::Coffee => write!(f, "Coffee"),
            Commodity::Honey => write!(f, "Honey"),
            Commodity::Coconut => write!(f, "Coconut"),
        }
    }
}
