use ahash::AHashMap;
use geo::{Centroid, MultiPoint, Point};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::candidate::kmeans::KMeans;
use crate::types::{FacilityTypes, PopulationPoint};

/// How many candidate sites to aim for before capping at the number of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterCount {
    /// A fixed number of clusters.
    Fixed(usize),
    /// `per_type` clusters for every facility type, capped at `cap`.
    PerFacilityType { per_type: usize, cap: usize },
}

impl Default for ClusterCount {
    fn default() -> Self { ClusterCount::Fixed(10) }
}

impl ClusterCount {
    /// Scaled variant: five clusters per facility type, at most twenty.
    pub fn per_facility_type() -> Self {
        ClusterCount::PerFacilityType { per_type: 5, cap: 20 }
    }

    /// Desired cluster count for a catalog with `num_types` facility types.
    pub fn desired(&self, num_types: usize) -> usize {
        match *self {
            ClusterCount::Fixed(n) => n,
            ClusterCount::PerFacilityType { per_type, cap } => (num_types * per_type).min(cap),
        }
    }
}

/// A proposed facility location: the centroid of a cluster of under-served points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSite {
    pub latitude: f64,
    pub longitude: f64,
    /// Most frequent sub-area among members (ties keep the first seen).
    pub sub_area_id: Option<String>,
    /// Total population of member points.
    pub population: f64,
    /// Indices of member points in the clustered input.
    pub members: Vec<usize>,
}

impl CandidateSite {
    /// Location as a `geo` point (lon, lat).
    #[inline] pub fn location(&self) -> Point<f64> { Point::new(self.longitude, self.latitude) }
}

/// One (site, facility type) pair the allocator may choose.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub site: usize,
    pub facility_type: String,
}

/// Most frequent sub-area id among `members`; ties go to the one encountered first.
fn majority_sub_area(points: &[PopulationPoint], members: &[usize]) -> Option<String> {
    let mut tally: AHashMap<&str, (usize, usize)> = AHashMap::new(); // id -> (first_seen, count)
    for (order, &idx) in members.iter().enumerate() {
        let id = points[idx].sub_area_id.as_str();
        if id.is_empty() { continue }
        tally.entry(id).or_insert((order, 0)).1 += 1;
    }

    tally.into_iter()
        .max_by(|(_, (first_a, count_a)), (_, (first_b, count_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(id, _)| id.to_string())
}

/// Clusters under-served population points into a bounded set of candidate sites.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    cluster_count: ClusterCount,
    seed: u64,
    max_iter: usize,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self { cluster_count: ClusterCount::default(), seed: 42, max_iter: 300 }
    }
}

impl CandidateGenerator {
    pub fn new(cluster_count: ClusterCount, seed: u64) -> Self {
        Self { cluster_count, seed, ..Self::default() }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    #[inline] pub fn cluster_count(&self) -> ClusterCount { self.cluster_count }

    #[inline] pub fn seed(&self) -> u64 { self.seed }

    /// Cluster `points` into at most `cluster_count.desired(num_types)` sites.
    ///
    /// Points with non-finite coordinates are ignored. Clusters that end up empty are dropped.
    pub fn sites(&self, points: &[PopulationPoint], num_types: usize) -> Vec<CandidateSite> {
        let valid = points.iter().enumerate()
            .filter(|(_, p)| p.latitude.is_finite() && p.longitude.is_finite())
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        if valid.len() < points.len() {
            warn!(skipped = points.len() - valid.len(), "ignoring points with non-finite coordinates");
        }

        let k = self.cluster_count.desired(num_types).min(valid.len());
        if k == 0 {
            return Vec::new();
        }

        let groups = if k == 1 {
            vec![valid]
        } else {
            let data = valid.iter()
                .map(|&idx| [points[idx].latitude, points[idx].longitude])
                .collect::<Vec<_>>();
            let clustering = KMeans::new(k, self.seed).with_max_iter(self.max_iter).fit(&data);
            debug!(k, iterations = clustering.iterations, "k-means converged");

            let mut groups = vec![Vec::new(); k];
            for (&idx, &label) in valid.iter().zip(&clustering.labels) {
                groups[label].push(idx);
            }
            groups
        };

        let sites = groups.into_iter()
            .filter(|members| !members.is_empty())
            .filter_map(|members| {
                let centroid = MultiPoint::from_iter(members.iter().map(|&idx| points[idx].location())).centroid()?;
                Some(CandidateSite {
                    latitude: centroid.y(),
                    longitude: centroid.x(),
                    sub_area_id: majority_sub_area(points, &members),
                    population: members.iter().map(|&idx| points[idx].weight()).sum(),
                    members,
                })
            })
            .collect::<Vec<_>>();

        if sites.len() < k {
            debug!(requested = k, produced = sites.len(), "dropped empty clusters");
        }
        sites
    }

    /// One candidate per (site, facility type), sites outermost, types in catalog order.
    pub fn candidates(sites: &[CandidateSite], types: &FacilityTypes) -> Vec<Candidate> {
        (0..sites.len())
            .flat_map(|site| types.iter().map(move |spec| Candidate { site, facility_type: spec.name.clone() }))
            .collect()
    }
}
