//! atlas-build: end-to-end data build.
//!
//! Reads the raw sources from a data directory, runs the parse → join →
//! supplement → extract pipeline and writes the four frontend artifacts
//! to an output directory. A join below the configured match rate aborts
//! the build; a missing or malformed WHR/OECD source only skips that
//! index's artifact.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use geojson::{Feature, FeatureCollection};
use tracing::{error, info, warn};

use atlas_pipeline_rust::extract::{
    default_oecd_country_iso_map, default_whr_country_iso_map, extract_hdi_values,
    extract_oecd_values, extract_whr_values, parse_country_iso_map, parse_oecd_csv,
    parse_whr_csv, CountryIsoMap,
};
use atlas_pipeline_rust::join::{join_regions, parse_geo_features, JoinedRegion};
use atlas_pipeline_rust::parse::parse_shdi_csv;
use atlas_pipeline_rust::registry::{index_definition, IndexId};
use atlas_pipeline_rust::schema::{validate_hdi_values, validate_oecd_bli_values, validate_whr_values};
use atlas_pipeline_rust::supplements::apply_supplements;

// Expected file names inside the data directory.
const SHDI_CSV: &str = "SHDI-v8.3.csv";
const REGIONS_GEOJSON: &str = "gdl-regions.geojson";
const WHR_CSV: &str = "whr-2025.csv";
const OECD_CSV: &str = "oecd-bli-tl2.csv";
const WHR_MAPPING_JSON: &str = "whr-country-to-iso.json";
const OECD_MAPPING_JSON: &str = "oecd-country-to-iso.json";

const DEFAULT_MIN_MATCH_RATE: f64 = 0.95;

struct BuildArgs {
    data_dir: PathBuf,
    out_dir: PathBuf,
    min_match_rate: f64,
}

fn parse_args(args: &[String]) -> Result<BuildArgs> {
    let mut positional = Vec::new();
    let mut min_match_rate = DEFAULT_MIN_MATCH_RATE;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--min-match-rate" => {
                let value = args
                    .get(i + 1)
                    .context("--min-match-rate requires a value")?;
                min_match_rate = value
                    .parse::<f64>()
                    .with_context(|| format!("invalid --min-match-rate `{value}`"))?;
                i += 2;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    if positional.len() != 2 {
        bail!("usage: atlas-build <data-dir> <out-dir> [--min-match-rate <0..1>]");
    }

    Ok(BuildArgs {
        data_dir: PathBuf::from(&positional[0]),
        out_dir: PathBuf::from(&positional[1]),
        min_match_rate,
    })
}

fn read_source(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

/// The mapping override from the data directory when present, the
/// embedded default otherwise.
fn load_mapping(dir: &Path, name: &str, default: fn() -> CountryIsoMap) -> Result<CountryIsoMap> {
    let path = dir.join(name);
    if path.exists() {
        info!(file = name, "using mapping override from data directory");
        parse_country_iso_map(&fs::read_to_string(&path)?)
            .with_context(|| format!("parsing {}", path.display()))
    } else {
        Ok(default())
    }
}

fn regions_feature_collection(regions: &[JoinedRegion]) -> Result<FeatureCollection> {
    let features = regions
        .iter()
        .map(|region| {
            let serde_json::Value::Object(properties) =
                serde_json::to_value(&region.properties)?
            else {
                bail!("region properties did not serialize to an object");
            };
            Ok(Feature {
                bbox: None,
                geometry: Some(region.geometry.clone()),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn write_artifact(out_dir: &Path, name: &str, value: &impl serde::Serialize) -> Result<()> {
    let path = out_dir.join(name);
    let body = serde_json::to_string(value)?;
    fs::write(&path, &body).with_context(|| format!("writing {}", path.display()))?;
    info!(file = name, bytes = body.len(), "wrote artifact");
    Ok(())
}

fn run(args: &BuildArgs) -> Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    // Stage 1: SHDI records and boundary geometries.
    let records = parse_shdi_csv(&read_source(&args.data_dir, SHDI_CSV)?);
    info!(records = records.len(), "parsed SHDI records");

    let features = parse_geo_features(&read_source(&args.data_dir, REGIONS_GEOJSON)?)?;
    info!(features = features.len(), "parsed boundary geometries");

    // Stage 2: join with the quality gate, then patch curated regions.
    let output = join_regions(&features, &records, Some(args.min_match_rate))?;
    info!(
        matched = output.report.matched,
        geo_only = output.report.geo_only.len(),
        csv_only = output.report.csv_only.len(),
        match_rate = format!("{:.1}%", output.report.match_rate * 100.0).as_str(),
        "joined geometries against records"
    );

    let mut joined = output.joined;
    apply_supplements(&mut joined);

    write_artifact(
        &args.out_dir,
        "regions.json",
        &geojson::GeoJson::FeatureCollection(regions_feature_collection(&joined)?),
    )?;

    // Stage 3: the HDI store comes straight from the deduplicated records.
    let hdi_values = extract_hdi_values(&records);
    validate_hdi_values(&hdi_values)?;
    write_artifact(
        &args.out_dir,
        index_definition(IndexId::Hdi).data_file,
        &hdi_values,
    )?;

    // Stage 4: the two optional country-keyed stores. Failure here skips
    // the artifact instead of failing the build.
    match build_whr_values(&args.data_dir) {
        Ok(values) => write_artifact(
            &args.out_dir,
            index_definition(IndexId::Whr).data_file,
            &values,
        )?,
        Err(e) => warn!(error = %e, "whr source unavailable, artifact skipped"),
    }

    match build_oecd_values(&args.data_dir) {
        Ok(values) => write_artifact(
            &args.out_dir,
            index_definition(IndexId::OecdBli).data_file,
            &values,
        )?,
        Err(e) => warn!(error = %e, "oecd source unavailable, artifact skipped"),
    }

    Ok(())
}

fn build_whr_values(data_dir: &Path) -> Result<atlas_pipeline_rust::schema::WhrValues> {
    let mapping = load_mapping(data_dir, WHR_MAPPING_JSON, default_whr_country_iso_map)?;
    let rows = parse_whr_csv(&read_source(data_dir, WHR_CSV)?)?;
    let values = extract_whr_values(&rows, &mapping);
    validate_whr_values(&values)?;
    info!(countries = values.len(), "extracted whr values");
    Ok(values)
}

fn build_oecd_values(data_dir: &Path) -> Result<atlas_pipeline_rust::schema::OecdBliValues> {
    let mapping = load_mapping(data_dir, OECD_MAPPING_JSON, default_oecd_country_iso_map)?;
    let rows = parse_oecd_csv(&read_source(data_dir, OECD_CSV)?)?;
    let values = extract_oecd_values(&rows, &mapping);
    validate_oecd_bli_values(&values)?;
    info!(countries = values.len(), "extracted oecd values");
    Ok(values)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("build failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let args = parse_args(&strings(&["data", "out"])).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.min_match_rate, DEFAULT_MIN_MATCH_RATE);
    }

    #[test]
    fn test_parse_args_min_match_rate() {
        let args =
            parse_args(&strings(&["data", "out", "--min-match-rate", "0.8"])).unwrap();
        assert_eq!(args.min_match_rate, 0.8);

        let flag_first =
            parse_args(&strings(&["--min-match-rate", "0.5", "data", "out"])).unwrap();
        assert_eq!(flag_first.min_match_rate, 0.5);
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&strings(&["data"])).is_err());
        assert!(parse_args(&strings(&["data", "out", "--min-match-rate"])).is_err());
        assert!(parse_args(&strings(&["data", "out", "--min-match-rate", "high"])).is_err());
    }
}
