use serde::{Deserialize, Serialize};

/// Administrative level a simulation is run at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographicLevel {
    SubArea,
    Regency,
    Province,
}

impl GeographicLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            GeographicLevel::SubArea => "sub_area",
            GeographicLevel::Regency => "regency",
            GeographicLevel::Province => "province",
        }
    }
}

/// A set of regions at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub level: GeographicLevel,
    pub ids: Vec<String>,
}

impl Scope {
    pub fn new(level: GeographicLevel, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { level, ids: ids.into_iter().map(Into::into).collect() }
    }

    #[inline] pub fn regency(id: impl Into<String>) -> Self { Self::new(GeographicLevel::Regency, [id]) }

    #[inline] pub fn province(id: impl Into<String>) -> Self { Self::new(GeographicLevel::Province, [id]) }

    #[inline] pub fn sub_areas(ids: impl IntoIterator<Item = impl Into<String>>) -> Self { Self::new(GeographicLevel::SubArea, ids) }

    #[inline] pub fn contains(&self, id: &str) -> bool { self.ids.iter().any(|s| s == id) }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level.to_str(), self.ids.join(","))
    }
}
