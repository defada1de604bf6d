//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result, ensure};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType}};

use crate::types::{Facility, PopulationPoint, Regency, SubArea};

/// Reads a CSV file with a header row; every column is read as a string so ids keep leading zeros.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads a CSV from a string, with the same typing rules as [`read_csv`].
pub(crate) fn read_csv_string(csv: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")
}

/// Required string column; nulls become empty strings.
fn str_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let col = df.column(name)
        .with_context(|| format!("[io::csv::read] Missing required column '{name}'"))?
        .cast(&DataType::String)?;
    Ok(col.str()?.into_iter().map(|s| s.unwrap_or_default().to_string()).collect())
}

/// Optional string column; a missing column or blank cell becomes `None`.
fn opt_str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let Ok(col) = df.column(name) else { return Ok(vec![None; df.height()]) };
    let col = col.cast(&DataType::String)?;
    Ok(col.str()?.into_iter()
        .map(|s| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

/// Optional numeric column; a missing column or unparsable cell becomes `None`.
fn opt_f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let Ok(col) = df.column(name) else { return Ok(vec![None; df.height()]) };
    let col = col.cast(&DataType::Float64)?;
    Ok(col.f64()?.into_iter().collect())
}

/// Required numeric column; every row must parse.
fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    ensure!(df.column(name).is_ok(), "[io::csv::read] Missing required column '{name}'");
    opt_f64_column(df, name)?.into_iter().enumerate()
        .map(|(row, value)| value.with_context(|| format!("[io::csv::read] Column '{name}' row {row} is not a number")))
        .collect()
}

/// Parse population points from columns `id, population_count, latitude, longitude, sub_area_id`.
pub(crate) fn read_population_points(df: &DataFrame) -> Result<Vec<PopulationPoint>> {
    let ids = str_column(df, "id")?;
    let counts = f64_column(df, "population_count")?;
    let lats = f64_column(df, "latitude")?;
    let lons = f64_column(df, "longitude")?;
    let sub_areas = str_column(df, "sub_area_id")?;

    ids.into_iter().zip(counts).zip(lats).zip(lons).zip(sub_areas)
        .enumerate()
        .map(|(row, ((((id, count), lat), lon), sub_area_id))| {
            ensure!(count >= 0.0, "[io::csv::read] Negative population_count {count} at row {row}");
            Ok(PopulationPoint::new(id, count, lat, lon, sub_area_id))
        })
        .collect()
}

/// Parse facilities from columns `facility_type, latitude, longitude` and optional `id, name, sub_area_id`.
pub(crate) fn read_facilities(df: &DataFrame) -> Result<Vec<Facility>> {
    let types = str_column(df, "facility_type")?;
    let lats = f64_column(df, "latitude")?;
    let lons = f64_column(df, "longitude")?;
    let ids = opt_str_column(df, "id")?;
    let names = opt_str_column(df, "name")?;
    let sub_areas = opt_str_column(df, "sub_area_id")?;

    Ok(types.into_iter().zip(lats).zip(lons).zip(ids).zip(names).zip(sub_areas)
        .map(|(((((facility_type, lat), lon), id), name), sub_area_id)| Facility {
            id,
            name,
            latitude: lat,
            longitude: lon,
            facility_type,
            sub_area_id,
        })
        .collect())
}

/// Parse sub-areas from columns `id, name, regency_id` and optional
/// `population_count, area_km2, poverty_level`.
pub(crate) fn read_sub_areas(df: &DataFrame) -> Result<Vec<SubArea>> {
    let ids = str_column(df, "id")?;
    let names = str_column(df, "name")?;
    let regencies = str_column(df, "regency_id")?;
    let populations = opt_f64_column(df, "population_count")?;
    let areas = opt_f64_column(df, "area_km2")?;
    let poverty = opt_f64_column(df, "poverty_level")?;

    Ok(ids.into_iter().zip(names).zip(regencies).zip(populations).zip(areas).zip(poverty)
        .map(|(((((id, name), regency_id), population_count), area), poverty_level)| SubArea {
            id,
            name,
            regency_id,
            population_count,
            area_km2: area.unwrap_or(0.0),
            poverty_level,
        })
        .collect())
}

/// Parse regencies from columns `id, name` and optional `province_id`.
pub(crate) fn read_regencies(df: &DataFrame) -> Result<Vec<Regency>> {
    let ids = str_column(df, "id")?;
    let names = str_column(df, "name")?;
    let provinces = opt_str_column(df, "province_id")?;

    Ok(ids.into_iter().zip(names).zip(provinces)
        .map(|((id, name), province_id)| Regency { id, name, province_id })
        .collect())
}
