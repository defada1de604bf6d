mod facility;
mod population;
mod sub_area;

pub use facility::{Facility, FacilityTypeSpec, FacilityTypes};
pub use population::{PopulationPoint, total_population};
pub use sub_area::{Regency, SubArea};
