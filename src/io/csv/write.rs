//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::allocate::Recommendation;
use crate::heatmap::HeatmapCell;
use crate::priority::SubAreaScore;

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write a DataFrame to a CSV string.
pub(crate) fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .context("[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .context("[io::csv::write] CSV output is not valid UTF-8")
}

/// One row per recommended facility, in selection order.
pub(crate) fn recommendations_frame(recommendations: &[Recommendation]) -> Result<DataFrame> {
    let column = |f: fn(&Recommendation) -> f64| recommendations.iter().map(f).collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("rank".into(), (1..=recommendations.len() as u32).collect::<Vec<_>>()).into(),
        Series::new("facility_type".into(), recommendations.iter().map(|r| r.facility_type.clone()).collect::<Vec<_>>()).into(),
        Series::new("latitude".into(), column(|r| r.latitude)).into(),
        Series::new("longitude".into(), column(|r| r.longitude)).into(),
        Series::new("sub_area_id".into(), recommendations.iter().map(|r| r.sub_area_id.clone()).collect::<Vec<_>>()).into(),
        Series::new("sub_area_name".into(), recommendations.iter().map(|r| r.sub_area_name.clone()).collect::<Vec<_>>()).into(),
        Series::new("estimated_cost".into(), column(|r| r.estimated_cost)).into(),
        Series::new("population_covered".into(), column(|r| r.population_covered)).into(),
        Series::new("coverage_radius_km".into(), column(|r| r.coverage_radius_km)).into(),
    ])?)
}

/// One row per sub-area, in rank order.
pub(crate) fn scores_frame(scores: &[SubAreaScore]) -> Result<DataFrame> {
    let column = |f: fn(&SubAreaScore) -> f64| scores.iter().map(f).collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("rank".into(), scores.iter().map(|s| s.rank as u32).collect::<Vec<_>>()).into(),
        Series::new("sub_area_id".into(), scores.iter().map(|s| s.sub_area_id.clone()).collect::<Vec<_>>()).into(),
        Series::new("sub_area_name".into(), scores.iter().map(|s| s.sub_area_name.clone()).collect::<Vec<_>>()).into(),
        Series::new("gap_factor".into(), column(|s| s.gap_factor)).into(),
        Series::new("efficiency_factor".into(), column(|s| s.efficiency_factor)).into(),
        Series::new("vulnerability_factor".into(), column(|s| s.vulnerability_factor)).into(),
        Series::new("composite_score".into(), column(|s| s.composite_score)).into(),
    ])?)
}

/// One row per heatmap cell.
pub(crate) fn heatmap_frame(cells: &[HeatmapCell]) -> Result<DataFrame> {
    let column = |f: fn(&HeatmapCell) -> f64| cells.iter().map(f).collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("latitude".into(), column(|c| c.latitude)).into(),
        Series::new("longitude".into(), column(|c| c.longitude)).into(),
        Series::new("population_density".into(), column(|c| c.population_density)).into(),
        Series::new("access_score".into(), column(|c| c.access_score)).into(),
        Series::new("distance_to_facility_km".into(), column(|c| c.distance_to_facility_km)).into(),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv::read_csv;

    fn make_test_recommendation() -> Recommendation {
        Recommendation {
            facility_type: "Pustu".into(),
            latitude: -6.5,
            longitude: 106.8,
            sub_area_id: Some("s1".into()),
            sub_area_name: None,
            estimated_cost: 500_000_000.0,
            population_covered: 1_000.0,
            coverage_radius_km: 3.0,
        }
    }

    #[test]
    fn recommendations_have_header_and_rows() {
        let mut df = recommendations_frame(&[make_test_recommendation()]).unwrap();
        let csv = write_csv_string(&mut df).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("rank,facility_type,latitude,longitude,sub_area_id,sub_area_name,estimated_cost,population_covered,coverage_radius_km")
        );
        assert!(lines.next().is_some_and(|row| row.starts_with("1,Pustu,")));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn heatmap_cells_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.csv");
        let cells = vec![HeatmapCell {
            latitude: -6.495,
            longitude: 106.805,
            population_density: 12.5,
            access_score: 0.5,
            distance_to_facility_km: 7.5,
        }];

        write_csv(&mut heatmap_frame(&cells).unwrap(), &path).unwrap();
        let df = read_csv(&path).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn empty_scores_still_have_columns() {
        let df = scores_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 7);
    }
}
