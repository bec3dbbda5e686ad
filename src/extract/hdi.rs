//! HDI value extraction.
//!
//! Input is the already-deduplicated SHDI record set. Records with a
//! null composite are dropped entirely; everything else is copied 1:1
//! into the region-keyed map. No aggregation happens here.

use crate::parse::ShdiRecord;
use crate::schema::{HdiRegionValue, HdiValues};

pub fn extract_hdi_values(records: &[ShdiRecord]) -> HdiValues {
    records
        .iter()
        .filter(|r| r.hdi.is_some())
        .map(|r| {
            (
                r.gdl_code.clone(),
                HdiRegionValue {
                    hdi: r.hdi,
                    education_index: r.education_index,
                    health_index: r.health_index,
                    income_index: r.income_index,
                    year: r.year,
                },
            )
        })
        .collect()
}
