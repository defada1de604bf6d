use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// An existing (or proposed) health facility at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub facility_type: String,
    #[serde(default)]
    pub sub_area_id: Option<String>,
}

impl Facility {
    pub fn new(facility_type: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: None,
            name: None,
            latitude,
            longitude,
            facility_type: facility_type.into(),
            sub_area_id: None,
        }
    }

    /// Attach an identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the sub-area the facility belongs to.
    pub fn in_sub_area(mut self, sub_area_id: impl Into<String>) -> Self {
        self.sub_area_id = Some(sub_area_id.into());
        self
    }

    /// Location as a `geo` point (lon, lat).
    #[inline] pub fn location(&self) -> Point<f64> { Point::new(self.longitude, self.latitude) }
}

/// Construction cost and service radius of one facility tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityTypeSpec {
    pub name: String,
    pub construction_cost: f64,
    pub coverage_radius_km: f64,
}

impl FacilityTypeSpec {
    pub fn new(name: impl Into<String>, construction_cost: f64, coverage_radius_km: f64) -> Self {
        Self { name: name.into(), construction_cost, coverage_radius_km }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlanError::InvalidFacilityType("facility type name is empty".into()));
        }
        if !(self.construction_cost.is_finite() && self.construction_cost > 0.0) {
            return Err(PlanError::InvalidFacilityType(format!(
                "{}: construction cost must be positive (got {})", self.name, self.construction_cost
            )));
        }
        if !(self.coverage_radius_km.is_finite() && self.coverage_radius_km > 0.0) {
            return Err(PlanError::InvalidFacilityType(format!(
                "{}: coverage radius must be positive (got {})", self.name, self.coverage_radius_km
            )));
        }
        Ok(())
    }
}

/// Ordered catalog of buildable facility tiers.
///
/// Catalog order is the enumeration order of the allocator, so it decides ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityTypes {
    specs: Vec<FacilityTypeSpec>,
}

impl Default for FacilityTypes {
    /// Puskesmas (2 billion, 5 km) and Pustu (500 million, 3 km).
    fn default() -> Self {
        Self {
            specs: vec![
                FacilityTypeSpec::new("Puskesmas", 2_000_000_000.0, 5.0),
                FacilityTypeSpec::new("Pustu", 500_000_000.0, 3.0),
            ],
        }
    }
}

impl FacilityTypes {
    /// Build a validated catalog.
    pub fn new(specs: Vec<FacilityTypeSpec>) -> Result<Self> {
        let types = Self { specs };
        types.validate()?;
        Ok(types)
    }

    /// Check the catalog is non-empty, names are unique, and costs and radii are positive.
    pub fn validate(&self) -> Result<()> {
        if self.specs.is_empty() {
            return Err(PlanError::InvalidFacilityType("facility catalog is empty".into()));
        }
        for (i, spec) in self.specs.iter().enumerate() {
            spec.validate()?;
            if self.specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(PlanError::InvalidFacilityType(format!("duplicate facility type {}", spec.name)));
            }
        }
        Ok(())
    }

    #[inline] pub fn len(&self) -> usize { self.specs.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.specs.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &FacilityTypeSpec> { self.specs.iter() }

    /// Look up a tier by name.
    pub fn get(&self, name: &str) -> Result<&FacilityTypeSpec> {
        self.specs.iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| PlanError::UnknownFacilityType(name.to_string()))
    }

    /// Largest coverage radius in the catalog (0 if empty).
    pub fn max_radius_km(&self) -> f64 {
        self.specs.iter().map(|spec| spec.coverage_radius_km).fold(0.0, f64::max)
    }

    /// Cheapest construction cost in the catalog, if any.
    pub fn min_cost(&self) -> Option<f64> {
        self.specs.iter().map(|spec| spec.construction_cost).reduce(f64::min)
    }

    /// Insert a tier, replacing any existing tier with the same name in place.
    pub fn insert(&mut self, spec: FacilityTypeSpec) -> Result<()> {
        spec.validate()?;
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
        Ok(())
    }

    /// Override the construction cost of an existing tier.
    pub fn with_cost(mut self, name: &str, construction_cost: f64) -> Result<Self> {
        let mut spec = self.get(name)?.clone();
        spec.construction_cost = construction_cost;
        self.insert(spec)?;
        Ok(self)
    }

    /// Override the coverage radius of an existing tier.
    pub fn with_radius(mut self, name: &str, coverage_radius_km: f64) -> Result<Self> {
        let mut spec = self.get(name)?.clone();
        spec.coverage_radius_km = coverage_radius_km;
        self.insert(spec)?;
        Ok(self)
    }
}
