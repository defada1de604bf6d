use serde::{Deserialize, Serialize};

/// Smallest administrative unit that is scored and ranked (e.g. a sub-district).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubArea {
    pub id: String,
    pub name: String,
    pub regency_id: String,
    #[serde(default)]
    pub population_count: Option<f64>, // Census count; falls back to the sum of its points
    #[serde(default)]
    pub area_km2: f64,
    #[serde(default)]
    pub poverty_level: Option<f64>, // Vulnerability indicator, e.g. poverty rate in percent
}

impl SubArea {
    pub fn new(id: impl Into<String>, name: impl Into<String>, regency_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            regency_id: regency_id.into(),
            population_count: None,
            area_km2: 0.0,
            poverty_level: None,
        }
    }

    pub fn with_population(mut self, population_count: f64) -> Self {
        self.population_count = Some(population_count);
        self
    }

    pub fn with_area(mut self, area_km2: f64) -> Self {
        self.area_km2 = area_km2;
        self
    }

    pub fn with_poverty_level(mut self, poverty_level: f64) -> Self {
        self.poverty_level = Some(poverty_level);
        self
    }
}

/// A regency: the group of sub-areas ranked against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regency {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub province_id: Option<String>,
}

impl Regency {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), province_id: None }
    }

    pub fn in_province(mut self, province_id: impl Into<String>) -> Self {
        self.province_id = Some(province_id.into());
        self
    }
}
