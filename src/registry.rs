//! Static catalogs: the available indices and the color palettes.
//!
//! Index and palette identity are enums, so an unknown id is a type
//! error rather than a runtime lookup failure; parsing an id string at
//! the boundary is the only place that can fail.

use crate::error::AtlasError;
use crate::schema::Dimension;

/// The three supported indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexId {
    Hdi,
    Whr,
    OecdBli,
}

pub const DEFAULT_INDEX_ID: IndexId = IndexId::Hdi;

impl IndexId {
    pub const ALL: [IndexId; 3] = [IndexId::Hdi, IndexId::Whr, IndexId::OecdBli];

    pub fn as_str(self) -> &'static str {
        match self {
            IndexId::Hdi => "hdi",
            IndexId::Whr => "whr",
            IndexId::OecdBli => "oecd-bli",
        }
    }

    pub fn parse(id: &str) -> Result<Self, AtlasError> {
        IndexId::ALL
            .into_iter()
            .find(|i| i.as_str() == id)
            .ok_or_else(|| AtlasError::validation("index id", format!("unknown id `{id}`")))
    }
}

/// One legend bin before color sampling: a `[min, max)` range (final
/// range closed), a representative point on the palette's [0, 1] axis,
/// and a human label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinDefinition {
    pub min: f64,
    pub max: f64,
    pub sample_point: f64,
    pub label: &'static str,
}

const fn bin(min: f64, max: f64, sample_point: f64, label: &'static str) -> BinDefinition {
    BinDefinition {
        min,
        max,
        sample_point,
        label,
    }
}

/// HDI bins: UNDP category boundaries subdivided for legend resolution.
pub const HDI_BIN_DEFINITIONS: &[BinDefinition] = &[
    bin(0.0, 0.450, 0.0, "Low (< 0.450)"),
    bin(0.450, 0.550, 0.14, "Low (0.450 - 0.549)"),
    bin(0.550, 0.650, 0.28, "Medium (0.550 - 0.649)"),
    bin(0.650, 0.700, 0.42, "Medium (0.650 - 0.699)"),
    bin(0.700, 0.800, 0.57, "High (0.700 - 0.799)"),
    bin(0.800, 0.850, 0.71, "Very High (0.800 - 0.849)"),
    bin(0.850, 0.900, 0.85, "Very High (0.850 - 0.899)"),
    bin(0.900, 1.0, 1.0, "Very High (0.900+)"),
];

/// Shared bins for the two 0-10 scored indices.
pub const TEN_POINT_BIN_DEFINITIONS: &[BinDefinition] = &[
    bin(0.0, 2.0, 0.0, "Very Low (< 2.0)"),
    bin(2.0, 3.0, 0.14, "Low (2.0 - 2.9)"),
    bin(3.0, 4.0, 0.28, "Below Average (3.0 - 3.9)"),
    bin(4.0, 5.0, 0.42, "Average (4.0 - 4.9)"),
    bin(5.0, 6.0, 0.57, "Above Average (5.0 - 5.9)"),
    bin(6.0, 7.0, 0.71, "High (6.0 - 6.9)"),
    bin(7.0, 8.0, 0.85, "Very High (7.0 - 7.9)"),
    bin(8.0, 10.0, 1.0, "Exceptional (8.0+)"),
];

/// Display metadata and bin scheme for one index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub id: IndexId,
    pub label: &'static str,
    /// Output artifact name under the data directory.
    pub data_file: &'static str,
    pub bin_definitions: &'static [BinDefinition],
    pub legend_title: &'static str,
    pub attribution: &'static str,
    /// Sub-dimensions, empty for single-value indices.
    pub dimensions: &'static [Dimension],
}

const HDI_DEFINITION: IndexDefinition = IndexDefinition {
    id: IndexId::Hdi,
    label: "Human Development Index",
    data_file: "hdi-values.json",
    bin_definitions: HDI_BIN_DEFINITIONS,
    legend_title: "Human Development Index",
    attribution: "Global Data Lab, Subnational HDI v8.3",
    dimensions: &[],
};

const WHR_DEFINITION: IndexDefinition = IndexDefinition {
    id: IndexId::Whr,
    label: "World Happiness Report",
    data_file: "whr-values.json",
    bin_definitions: TEN_POINT_BIN_DEFINITIONS,
    legend_title: "World Happiness Report",
    attribution: "Helliwell et al. (2025), World Happiness Report 2025",
    dimensions: &[],
};

const OECD_BLI_DEFINITION: IndexDefinition = IndexDefinition {
    id: IndexId::OecdBli,
    label: "OECD Better Life Index",
    data_file: "oecd-bli-values.json",
    bin_definitions: TEN_POINT_BIN_DEFINITIONS,
    legend_title: "OECD Better Life Index",
    attribution: "OECD Regional Well-Being, CC BY 4.0",
    dimensions: &Dimension::ALL,
};

pub fn index_definition(id: IndexId) -> &'static IndexDefinition {
    match id {
        IndexId::Hdi => &HDI_DEFINITION,
        IndexId::Whr => &WHR_DEFINITION,
        IndexId::OecdBli => &OECD_BLI_DEFINITION,
    }
}

// ============================================================================
// Palette registry
// ============================================================================

/// The continuous palettes offered by the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteId {
    Plasma,
    Viridis,
    Inferno,
    Magma,
    Cividis,
    Turbo,
}

pub const DEFAULT_PALETTE_ID: PaletteId = PaletteId::Plasma;

impl PaletteId {
    pub const ALL: [PaletteId; 6] = [
        PaletteId::Plasma,
        PaletteId::Viridis,
        PaletteId::Inferno,
        PaletteId::Magma,
        PaletteId::Cividis,
        PaletteId::Turbo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaletteId::Plasma => "plasma",
            PaletteId::Viridis => "viridis",
            PaletteId::Inferno => "inferno",
            PaletteId::Magma => "magma",
            PaletteId::Cividis => "cividis",
            PaletteId::Turbo => "turbo",
        }
    }

    pub fn parse(id: &str) -> Result<Self, AtlasError> {
        PaletteId::ALL
            .into_iter()
            .find(|p| p.as_str() == id)
            .ok_or_else(|| AtlasError::validation("palette id", format!("unknown id `{id}`")))
    }

    pub fn definition(self) -> &'static PaletteDefinition {
        match self {
            PaletteId::Plasma => &PLASMA,
            PaletteId::Viridis => &VIRIDIS,
            PaletteId::Inferno => &INFERNO,
            PaletteId::Magma => &MAGMA,
            PaletteId::Cividis => &CIVIDIS,
            PaletteId::Turbo => &TURBO,
        }
    }
}

/// A continuous palette as evenly spaced RGB stops with linear
/// interpolation between them.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteDefinition {
    pub id: PaletteId,
    pub label: &'static str,
    stops: &'static [(u8, u8, u8)],
}

impl PaletteDefinition {
    /// Sample the palette at `t` in [0, 1]; out-of-range values clamp.
    pub fn interpolate(&self, t: f64) -> String {
        let t = t.clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f64;
        let scaled = t * segments;
        let i = (scaled.floor() as usize).min(self.stops.len() - 2);
        let frac = scaled - i as f64;

        let (r0, g0, b0) = self.stops[i];
        let (r1, g1, b1) = self.stops[i + 1];
        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * frac).round() as u8
        };
        format!("#{:02x}{:02x}{:02x}", lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

const PLASMA: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Plasma,
    label: "Plasma",
    stops: &[
        (0x0d, 0x08, 0x87),
        (0x9c, 0x17, 0x9e),
        (0xcc, 0x47, 0x78),
        (0xed, 0x79, 0x53),
        (0xf0, 0xf9, 0x21),
    ],
};

const VIRIDIS: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Viridis,
    label: "Viridis",
    stops: &[
        (0x44, 0x01, 0x54),
        (0x3b, 0x52, 0x8b),
        (0x21, 0x91, 0x8c),
        (0x5e, 0xc9, 0x62),
        (0xfd, 0xe7, 0x25),
    ],
};

const INFERNO: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Inferno,
    label: "Inferno",
    stops: &[
        (0x00, 0x00, 0x04),
        (0x57, 0x10, 0x6e),
        (0xbc, 0x37, 0x54),
        (0xf9, 0x8e, 0x09),
        (0xfc, 0xff, 0xa4),
    ],
};

const MAGMA: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Magma,
    label: "Magma",
    stops: &[
        (0x00, 0x00, 0x04),
        (0x51, 0x12, 0x7c),
        (0xb7, 0x37, 0x79),
        (0xfc, 0x89, 0x61),
        (0xfc, 0xfd, 0xbf),
    ],
};

const CIVIDIS: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Cividis,
    label: "Cividis",
    stops: &[
        (0x00, 0x22, 0x4e),
        (0x35, 0x45, 0x6c),
        (0x66, 0x69, 0x70),
        (0xa6, 0x9d, 0x75),
        (0xff, 0xea, 0x46),
    ],
};

const TURBO: PaletteDefinition = PaletteDefinition {
    id: PaletteId::Turbo,
    label: "Turbo",
    stops: &[
        (0x30, 0x12, 0x3b),
        (0x28, 0xbb, 0xec),
        (0xa4, 0xfc, 0x3c),
        (0xfb, 0x7e, 0x21),
        (0x7a, 0x04, 0x03),
    ],
};
