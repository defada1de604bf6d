use std::path::Path;

use ahash::AHashSet;
use anyhow::{Context, Result};
use tracing::info;

use crate::geom::BoundingBox;
use crate::io::csv::{read_csv, read_facilities, read_population_points, read_regencies, read_sub_areas};
use crate::region::scope::{GeographicLevel, Scope};
use crate::types::{Facility, PopulationPoint, Regency, SubArea};

/// Read access to the regional data the planner works on.
pub trait RegionRepository {
    fn regency(&self, id: &str) -> Result<Option<Regency>>;

    /// Sub-areas inside `scope`, in storage order.
    fn sub_areas(&self, scope: &Scope) -> Result<Vec<SubArea>>;

    fn population_points(&self, sub_area_ids: &[String]) -> Result<Vec<PopulationPoint>>;

    fn facilities(&self, sub_area_ids: &[String]) -> Result<Vec<Facility>>;

    /// Facilities in `sub_area_ids` plus any other facility located inside `bbox`, in storage order.
    fn facilities_around(&self, sub_area_ids: &[String], bbox: &BoundingBox) -> Result<Vec<Facility>>;
}

/// Repository backed by plain vectors, optionally loaded from a directory of CSV files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    regencies: Vec<Regency>,
    sub_areas: Vec<SubArea>,
    points: Vec<PopulationPoint>,
    facilities: Vec<Facility>,
}

impl InMemoryRepository {
    pub fn new(regencies: Vec<Regency>, sub_areas: Vec<SubArea>, points: Vec<PopulationPoint>, facilities: Vec<Facility>) -> Self {
        Self { regencies, sub_areas, points, facilities }
    }

    /// Load `regencies.csv`, `sub_areas.csv`, `population_points.csv` and (if present) `facilities.csv`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let load = |name: &str| {
            let path = dir.join(name);
            read_csv(&path).with_context(|| format!("[region] Failed to load {}", path.display()))
        };

        let regencies = read_regencies(&load("regencies.csv")?)?;
        let sub_areas = read_sub_areas(&load("sub_areas.csv")?)?;
        let points = read_population_points(&load("population_points.csv")?)?;
        let facilities = if dir.join("facilities.csv").exists() {
            read_facilities(&load("facilities.csv")?)?
        } else {
            Vec::new()
        };

        info!(
            regencies = regencies.len(),
            sub_areas = sub_areas.len(),
            points = points.len(),
            facilities = facilities.len(),
            dir = %dir.display(),
            "loaded region data"
        );
        Ok(Self { regencies, sub_areas, points, facilities })
    }

    #[inline] pub fn regencies(&self) -> &[Regency] { &self.regencies }
}

impl RegionRepository for InMemoryRepository {
    fn regency(&self, id: &str) -> Result<Option<Regency>> {
        Ok(self.regencies.iter().find(|r| r.id == id).cloned())
    }

    fn sub_areas(&self, scope: &Scope) -> Result<Vec<SubArea>> {
        let regency_ids: AHashSet<&str> = match scope.level {
            GeographicLevel::SubArea => {
                return Ok(self.sub_areas.iter().filter(|s| scope.contains(&s.id)).cloned().collect());
            }
            GeographicLevel::Regency => scope.ids.iter().map(String::as_str).collect(),
            GeographicLevel::Province => self.regencies.iter()
                .filter(|r| r.province_id.as_deref().is_some_and(|p| scope.contains(p)))
                .map(|r| r.id.as_str())
                .collect(),
        };
        Ok(self.sub_areas.iter().filter(|s| regency_ids.contains(s.regency_id.as_str())).cloned().collect())
    }

    fn population_points(&self, sub_area_ids: &[String]) -> Result<Vec<PopulationPoint>> {
        let ids: AHashSet<&str> = sub_area_ids.iter().map(String::as_str).collect();
        Ok(self.points.iter().filter(|p| ids.contains(p.sub_area_id.as_str())).cloned().collect())
    }

    fn facilities(&self, sub_area_ids: &[String]) -> Result<Vec<Facility>> {
        let ids: AHashSet<&str> = sub_area_ids.iter().map(String::as_str).collect();
        Ok(self.facilities.iter()
            .filter(|f| f.sub_area_id.as_deref().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect())
    }

    fn facilities_around(&self, sub_area_ids: &[String], bbox: &BoundingBox) -> Result<Vec<Facility>> {
        let ids: AHashSet<&str> = sub_area_ids.iter().map(String::as_str).collect();
        Ok(self.facilities.iter()
            .filter(|f| f.sub_area_id.as_deref().is_some_and(|id| ids.contains(id)) || bbox.contains(f.location()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_repository() -> InMemoryRepository {
        InMemoryRepository::new(
            vec![
                Regency::new("3201", "Bogor").in_province("32"),
                Regency::new("3202", "Sukabumi").in_province("32"),
                Regency::new("3301", "Cilacap").in_province("33"),
            ],
            vec![
                SubArea::new("s1", "Cibinong", "3201"),
                SubArea::new("s2", "Citeureup", "3201"),
                SubArea::new("s3", "Palabuhanratu", "3202"),
                SubArea::new("s4", "Kroya", "3301"),
            ],
            vec![
                PopulationPoint::new("p1", 100.0, -6.48, 106.85, "s1"),
                PopulationPoint::new("p2", 200.0, -6.52, 106.88, "s2"),
                PopulationPoint::new("p3", 300.0, -6.99, 106.55, "s3"),
            ],
            vec![
                Facility::new("Puskesmas", -6.48, 106.85).in_sub_area("s1"),
                Facility::new("Pustu", -6.99, 106.55).in_sub_area("s3"),
                Facility::new("Pustu", -6.50, 106.80),
            ],
        )
    }

    #[test]
    fn scopes_select_sub_areas_by_level() {
        let repo = make_test_repository();
        let ids = |scope: Scope| repo.sub_areas(&scope).unwrap().into_iter().map(|s| s.id).collect::<Vec<_>>();

        assert_eq!(ids(Scope::regency("3201")), vec!["s1", "s2"]);
        assert_eq!(ids(Scope::province("32")), vec!["s1", "s2", "s3"]);
        assert_eq!(ids(Scope::sub_areas(["s4", "s2"])), vec!["s2", "s4"]);
        assert!(ids(Scope::regency("9999")).is_empty());
    }

    #[test]
    fn points_and_facilities_filter_by_sub_area() {
        let repo = make_test_repository();
        let ids = vec!["s1".to_string(), "s2".to_string()];
        assert_eq!(repo.population_points(&ids).unwrap().len(), 2);
        // The facility without a sub-area is never matched.
        assert_eq!(repo.facilities(&ids).unwrap().len(), 1);
    }

    #[test]
    fn facilities_around_adds_untagged_and_neighbouring_facilities() {
        let repo = make_test_repository();
        let ids = vec!["s1".to_string(), "s2".to_string()];
        let bbox = BoundingBox::new(-6.52, 106.78, -6.46, 106.90);

        let found = repo.facilities_around(&ids, &bbox).unwrap();
        let types = found.iter().map(|f| f.facility_type.as_str()).collect::<Vec<_>>();
        assert_eq!(types, vec!["Puskesmas", "Pustu"]);
        assert_eq!(found[1].sub_area_id, None);

        // The Sukabumi facility is neither tagged in scope nor inside the box.
        assert!(found.iter().all(|f| f.latitude > -6.9));
    }

    #[test]
    fn loads_from_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("regencies.csv"), "id,name,province_id\n3201,Bogor,32\n").unwrap();
        std::fs::write(dir.path().join("sub_areas.csv"), "id,name,regency_id,area_km2\ns1,Cibinong,3201,43.4\n").unwrap();
        std::fs::write(
            dir.path().join("population_points.csv"),
            "id,population_count,latitude,longitude,sub_area_id\np1,1000,-6.48,106.85,s1\n",
        ).unwrap();

        let repo = InMemoryRepository::from_dir(dir.path()).unwrap();
        assert_eq!(repo.regency("3201").unwrap().map(|r| r.name), Some("Bogor".to_string()));
        assert_eq!(repo.sub_areas(&Scope::regency("3201")).unwrap().len(), 1);
        assert!(repo.facilities(&["s1".to_string()]).unwrap().is_empty());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InMemoryRepository::from_dir(dir.path()).is_err());
    }
}
