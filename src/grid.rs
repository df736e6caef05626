use num_enum::TryFromPrimitive;

pub use self::{
    gaussian::GaussianGridDefinition,
    lambert::LambertGridDefinition,
    latlon::LatLonGridDefinition,
    polar_stereographic::PolarStereographicGridDefinition,
    predefined::PredefinedGrids,
    rotated_ll::RotatedLatLonGridDefinition,
};

/// Data representation types an Edition 0 Grid Description Block can
/// carry. Table 9 assigns more codes (3 for Lambert conformal, 10 for
/// rotated lat/lon among them), but no Edition 0 wire layout exists for
/// those here, so they fall through as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DataRepresentation {
    LatLon = 0,
    Gaussian = 4,
    PolarStereographic = 5,
}

/// Scan-mode octet: three orientation bits describing the packed sample
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanningMode(pub u8);

impl ScanningMode {
    /// Points scan in the -i direction (east to west) when set.
    pub fn scans_west(&self) -> bool {
        self.0 & 0b10000000 != 0
    }

    /// Points scan in the +j direction (south to north) when set.
    pub fn scans_north(&self) -> bool {
        self.0 & 0b01000000 != 0
    }

    /// Adjacent points are consecutive in j rather than i when set.
    pub fn j_sweeps_first(&self) -> bool {
        self.0 & 0b00100000 != 0
    }

    /// Some encoders leave garbage in the five reserved bits; worth a
    /// diagnostic but not an error.
    pub fn has_suspect_low_bits(&self) -> bool {
        self.0 >> 5 == 0 && self.0 != 0
    }
}

/// Projection centre octet of polar stereographic and Lambert conformal
/// grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectionCentreFlag(pub u8);

impl ProjectionCentreFlag {
    /// The south pole is on the projection plane when set.
    pub fn is_south_pole(&self) -> bool {
        self.0 & 0b10000000 != 0
    }

    /// Bipolar symmetric form (Lambert conformal only).
    pub fn is_bipolar(&self) -> bool {
        self.0 & 0b01000000 != 0
    }
}

/// Section 2 contents, or the predefined equivalent when the message
/// carries no Grid Description Block.
///
/// Lambert conformal and rotated lat/lon variants never come off an
/// Edition 0 wire (see [`DataRepresentation`]); they exist for callers
/// that feed the projection stage from elsewhere, such as later-edition
/// ingest sharing the same map construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridDescription {
    LatLon(LatLonGridDefinition),
    Gaussian(GaussianGridDefinition),
    PolarStereographic(PolarStereographicGridDefinition),
    LambertConformal(LambertGridDefinition),
    RotatedLatLon(RotatedLatLonGridDefinition),
}

impl GridDescription {
    /// Grid dimensions `(ni, nj)` as coded, excluding any implicit pole
    /// row.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::LatLon(g) => (g.ni as usize, g.nj as usize),
            Self::Gaussian(g) => (g.ni as usize, g.nj as usize),
            Self::PolarStereographic(g) => (g.nx as usize, g.ny as usize),
            Self::LambertConformal(g) => (g.nx as usize, g.ny as usize),
            Self::RotatedLatLon(g) => (g.ni as usize, g.nj as usize),
        }
    }

    /// Signed direction increments `(di, dj)`. Gaussian grids carry the
    /// parallel count N in the j slot, matching how the sample reorder
    /// consumes it.
    pub fn deltas(&self) -> (i32, i32) {
        match self {
            Self::LatLon(g) => (g.di, g.dj),
            Self::Gaussian(g) => (g.di, g.n),
            Self::PolarStereographic(g) => (g.dx, g.dy),
            Self::LambertConformal(g) => (g.dx, g.dy),
            Self::RotatedLatLon(g) => (g.di, g.dj),
        }
    }

    pub fn scanning_mode(&self) -> ScanningMode {
        match self {
            Self::LatLon(g) => g.scanning_mode,
            Self::Gaussian(g) => g.scanning_mode,
            Self::PolarStereographic(g) => g.scanning_mode,
            Self::LambertConformal(g) => g.scanning_mode,
            Self::RotatedLatLon(g) => g.scanning_mode,
        }
    }

    /// -1 for a pole datum packed before the grid, +1 for one packed
    /// after, 0 for none. Only predefined lat/lon grids set this.
    pub fn pole_extra(&self) -> i8 {
        match self {
            Self::LatLon(g) => g.pole_extra,
            _ => 0,
        }
    }

    /// 0 when vector components are east/north relative, 1 when they
    /// follow the projection's x/y axes (bit 3 of the component octet).
    /// Lat/lon axes are east/north already.
    pub fn component_flag(&self) -> u8 {
        let grid_relative = match self {
            Self::LatLon(_) => false,
            Self::Gaussian(_) => false,
            Self::PolarStereographic(g) => g.component_flags & 0x08 != 0,
            Self::LambertConformal(g) => g.component_flags & 0x08 != 0,
            Self::RotatedLatLon(g) => g.resolution_flags & 0x08 != 0,
        };
        u8::from(grid_relative)
    }

    /// Short grid type name.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::LatLon(_) => "latitude_longitude",
            Self::Gaussian(_) => "gaussian",
            Self::PolarStereographic(_) => "polar_stereographic",
            Self::LambertConformal(_) => "lambert_conformal",
            Self::RotatedLatLon(_) => "rotated_latitude_longitude",
        }
    }
}

mod gaussian;
mod lambert;
mod latlon;
mod polar_stereographic;
pub(crate) mod predefined;
mod rotated_ll;
