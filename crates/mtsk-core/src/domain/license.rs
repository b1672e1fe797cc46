use serde::{Deserialize, Serialize};
use std::fmt;

/// License and difference classes a school can enrol candidates for.
///
/// The set is closed: tags outside of it are ignored wherever counts or fees
/// are read from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LicenseClass {
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A1")]
    A1,
    #[serde(rename = "A2")]
    A2,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "FARK_A1")]
    FarkA1,
    #[serde(rename = "FARK_A2")]
    FarkA2,
    #[serde(rename = "BAKANLIK_A1")]
    BakanlikA1,
}

impl LicenseClass {
    pub const COUNT: usize = 8;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::B,
            Self::A1,
            Self::A2,
            Self::C,
            Self::D,
            Self::FarkA1,
            Self::FarkA2,
            Self::BakanlikA1,
        ]
    }

    /// Difference classes share the smaller quota pool.
    pub const fn difference_classes() -> [Self; 3] {
        [Self::FarkA1, Self::FarkA2, Self::BakanlikA1]
    }

    pub const fn is_difference(self) -> bool {
        matches!(self, Self::FarkA1 | Self::FarkA2 | Self::BakanlikA1)
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::C => "C",
            Self::D => "D",
            Self::FarkA1 => "FARK_A1",
            Self::FarkA2 => "FARK_A2",
            Self::BakanlikA1 => "BAKANLIK_A1",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::B => "B Sınıfı",
            Self::A1 => "A1 Sınıfı",
            Self::A2 => "A2 Sınıfı",
            Self::C => "C Sınıfı",
            Self::D => "D Sınıfı",
            Self::FarkA1 => "Fark A1",
            Self::FarkA2 => "Fark A2",
            Self::BakanlikA1 => "Bakanlık A1",
        }
    }

    pub fn from_tag(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|class| class.tag() == raw.trim())
    }
}

impl fmt::Display for LicenseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
