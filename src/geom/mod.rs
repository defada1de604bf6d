mod bbox;
mod distance;
mod index;

pub use bbox::BoundingBox;
pub use distance::{EARTH_RADIUS_KM, KM_PER_DEGREE, distance, haversine_km};
pub use index::PointIndex;
