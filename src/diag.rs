use std::fmt::{self, Display, Formatter};

use crate::error::Grib0Error;

/// Structured diagnostics emitted while decoding.
///
/// The decoder never writes to stderr; everything the operator might want
/// to see about a stream goes through a [`DiagnosticSink`] injected at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent {
    /// A known CMC encoder bug: surface data coded as an isobaric level
    /// at 0 hPa. The level type has been rewritten to surface.
    SurfaceCodedAsIsobaric { centre_id: u8, model_id: u8 },
    /// The lower five bits of a scan-mode octet were set while the three
    /// orientation bits were clear; the octet is used as-is.
    SuspectScanFlags { octet: u8 },
    /// No model label for this (centre, model) pair; a `gribmodel:` tag
    /// was substituted. Reported once per pair per pipeline.
    UnknownModel { centre_id: u8, model_id: u8 },
    /// No element label for this parameter code; a `gribelement:` tag was
    /// substituted. Reported once per code per pipeline.
    UnknownElement { parameter: u8 },
    /// A message could not be decoded; iteration resumes at the next
    /// sentinel after its recovery point.
    MessageError { offset: u64, error: Grib0Error },
}

impl Display for DecodeEvent {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::SurfaceCodedAsIsobaric {
                centre_id,
                model_id,
            } => write!(
                f,
                "correcting surface coded as isobaric level at 0 hPa (centre {centre_id}, model {model_id})"
            ),
            Self::SuspectScanFlags { octet } => {
                write!(f, "error in lower five bits of scan code: {octet:#04x}")
            }
            Self::UnknownModel {
                centre_id,
                model_id,
            } => write!(f, "unrecognized model {model_id} from centre {centre_id}"),
            Self::UnknownElement { parameter } => {
                write!(f, "unrecognized element parameter {parameter}")
            }
            Self::MessageError { offset, error } => {
                write!(f, "message at offset {offset} dropped: {error}")
            }
        }
    }
}

/// Receiver for [`DecodeEvent`]s.
pub trait DiagnosticSink {
    fn report(&mut self, event: DecodeEvent);
}

/// Forwards events to the `tracing` subscriber: message drops as warnings,
/// everything else at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, event: DecodeEvent) {
        match &event {
            DecodeEvent::MessageError { .. } => tracing::warn!(target: "grib0", "{event}"),
            _ => tracing::debug!(target: "grib0", "{event}"),
        }
    }
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _event: DecodeEvent) {}
}

/// Collects events in order; used by tests and batch drivers that render
/// their own reports.
#[derive(Debug, Default)]
pub struct VecSink(pub Vec<DecodeEvent>);

impl DiagnosticSink for VecSink {
    fn report(&mut self, event: DecodeEvent) {
        self.0.push(event);
    }
}
