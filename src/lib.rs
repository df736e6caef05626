pub mod codetables;
mod context;
mod datatypes;
mod decoder;
mod diag;
mod error;
mod grid;
mod projection;
mod reader;
mod reorder;
mod time;
mod utils;

pub use crate::{
    context::{from_path, from_reader, Grib0, Grib0Options},
    datatypes::*,
    diag::{DecodeEvent, DiagnosticSink, NullSink, TracingSink, VecSink},
    error::*,
    grid::{
        DataRepresentation, GaussianGridDefinition, GridDescription, LambertGridDefinition,
        LatLonGridDefinition, PolarStereographicGridDefinition, PredefinedGrids,
        ProjectionCentreFlag, RotatedLatLonGridDefinition, ScanningMode,
    },
    projection::{
        format_mapdef, format_projection, parse_mapdef, parse_projection, GridDefinition,
        MapDefinition, MapProjection, Projection,
    },
    reader::{Grib0Read, SeekableGrib0Reader},
};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
