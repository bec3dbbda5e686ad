//! Subnational well-being atlas data pipeline.
//!
//! Turns three raw statistical sources (GDL Subnational HDI, the World
//! Happiness Report and the OECD regional well-being tables) plus a
//! boundary GeoJSON into the joined, validated artifacts the atlas
//! frontend renders, and provides the lookup machinery (value stores,
//! weighted composites, color binning, region search) those artifacts
//! are consumed through.
//!
//! Pipeline order: `parse` → `join` (+ `supplements`) → `extract` →
//! artifacts; the `loader`/`accessor`/`classify`/`search` modules serve
//! the read side.

pub mod accessor;
pub mod classify;
pub mod error;
pub mod extract;
pub mod join;
pub mod loader;
pub mod parse;
pub mod registry;
pub mod schema;
pub mod search;
pub mod supplements;
pub mod weights;

pub use accessor::{ValueAccessor, ValueStore};
pub use error::AtlasError;
pub use join::{join_regions, parse_geo_features, JoinOutput, JoinReport, JoinedRegion};
pub use parse::{parse_shdi_csv, RegionLevel, ShdiRecord};
pub use registry::{index_definition, IndexId, PaletteId, DEFAULT_INDEX_ID, DEFAULT_PALETTE_ID};
pub use schema::Dimension;
pub use weights::{compute_weighted_average, redistribute_weights, DimensionWeights, EQUAL_WEIGHTS};
