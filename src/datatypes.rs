use crate::{grid::GridDescription, projection::MapProjection};

/// Section 0 contents. Edition 0 indicator blocks carry no length, so
/// both fields are fixed on a successful sentinel match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indicator {
    pub edition: u8,
    pub length: u32,
}

/// Level or layer description from octets 10-12 of the PDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Level {
    pub level_type: u8,
    pub top: u8,
    pub bottom: u8,
}

impl Level {
    /// The two level octets combined, as isobaric and sigma levels encode
    /// their value.
    pub fn combined(&self) -> u16 {
        (u16::from(self.top) << 8) + u16::from(self.bottom)
    }
}

/// Reference date and time from octets 13-17 of the PDB. The year is the
/// year of century as coded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferenceTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

/// Forecast time description from octets 18-24 of the PDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastSpec {
    pub unit: u8,
    pub time1: u8,
    pub time2: u8,
    pub range_type: u8,
    pub nb_averaged: u16,
    pub nb_missing: u8,
}

/// Section 1, the Product Definition Block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductDefinition {
    pub length: u32,
    pub edition: u8,
    pub centre_id: u8,
    pub model_id: u8,
    /// Catalogue number used to look up a predefined grid when no Grid
    /// Description Block follows.
    pub grid_catalogue: u8,
    pub has_grid_description: bool,
    pub has_bitmap: bool,
    pub parameter: u8,
    pub level: Level,
    pub reference: ReferenceTime,
    pub forecast: ForecastSpec,
    /// Decimal scale factor D. The Edition 0 PDB carries no such octet;
    /// it is always 0 here and exists so the unpacking arithmetic matches
    /// later editions.
    pub decimal_scale: i16,
}

/// Section 3 header plus the raw bitmap bits.
///
/// Nothing downstream of the decoder interprets the bitmap; it is carried
/// opaquely for callers that want it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    pub length: u32,
    pub unused_bits: u8,
    pub table: u16,
    pub bits: Vec<u8>,
}

/// Section 4 header octets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BinaryDataHeader {
    pub length: u32,
    pub flags: u8,
    /// Binary scale factor E, decoded from 16-bit sign-magnitude.
    pub binary_scale: i16,
    /// Reference value R, decoded from the IBM 32-bit float format.
    pub reference: f64,
    pub bits_per_value: u8,
}

/// The decoded sections of the most recent message, for callers that log
/// or inspect message structure.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageStructure {
    pub indicator: Indicator,
    pub product: ProductDefinition,
    pub grid: GridDescription,
    pub bitmap: Option<Bitmap>,
    pub binary: BinaryDataHeader,
}

/// Identifier strings resolved for a decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentifiers {
    pub model: String,
    pub rtime: String,
    pub vtimeb: String,
    pub vtimee: String,
    pub element: String,
    pub level: String,
    pub units: String,
}

/// A fully decoded, self-describing field.
///
/// Data is in canonical order: row-major, rows running south to north and
/// columns west to east. `nj` includes any synthesised pole row, so it may
/// exceed the wire's Nj by one. All strings and buffers are owned; nothing
/// borrows from the pipeline, which may be reused immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub model: String,
    pub rtime: String,
    pub vtimeb: String,
    pub vtimee: String,
    pub element: String,
    pub level: String,
    pub units: String,
    pub map_projection: MapProjection,
    pub ni: usize,
    pub nj: usize,
    pub data: Vec<f32>,
    /// Raw section 3 bitmap, undecoded. See [`Bitmap`].
    pub bitmap: Option<Vec<u8>>,
    /// 0 when vector components are earth-relative (easting/northing),
    /// 1 when they follow the grid's x/y axes.
    pub component_flag: u8,
}

impl DecodedField {
    pub fn identifiers(&self) -> FieldIdentifiers {
        FieldIdentifiers {
            model: self.model.clone(),
            rtime: self.rtime.clone(),
            vtimeb: self.vtimeb.clone(),
            vtimee: self.vtimee.clone(),
            element: self.element.clone(),
            level: self.level.clone(),
            units: self.units.clone(),
        }
    }
}
