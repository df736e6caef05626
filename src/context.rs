use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use chrono::{Datelike, Utc};

use crate::{
    codetables::{format_coded_level, IngestTables},
    datatypes::{
        DecodedField, FieldIdentifiers, Indicator, MessageStructure, ProductDefinition,
    },
    decoder::unpack_samples,
    diag::{DecodeEvent, DiagnosticSink, TracingSink},
    error::{Grib0Error, LookupKind, ParseError, ResolveError},
    grid::{GridDescription, PredefinedGrids},
    projection::build_map_projection,
    reader::{Grib0Read, SeekableGrib0Reader},
    reorder::{normalise_scan_order, synthesise_pole_row},
    time::{build_tstamp, full_year, jdate, tnorm},
};

/// Construction-time knobs for the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Grib0Options {
    /// Anchor year for expanding two-digit reference years: they land in
    /// the 100-year window starting 49 years before this. Fixing it makes
    /// decoding deterministic across runs.
    pub century_anchor: i32,
}

impl Default for Grib0Options {
    fn default() -> Self {
        Self {
            century_anchor: Utc::now().year(),
        }
    }
}

/// Decoder pipeline over a stream of concatenated Edition 0 messages.
///
/// The pipeline is the single owner of all decoder state: the reader,
/// the injected lookup tables, the diagnostic sink, and the most recent
/// message's sections. Iteration pulls one decoded field at a time;
/// per-message failures are reported and skipped by resuming the
/// sentinel search past the failed message's recovery point, so intact
/// downstream messages still come out.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut grib0 = grib0::from_path("model_run.grib")?;
///     for field in &mut grib0 {
///         let field = field?;
///         println!(
///             "{} {} {} at {}",
///             field.model, field.element, field.level, field.vtimeb
///         );
///     }
///     Ok(())
/// }
/// ```
pub struct Grib0<R> {
    reader: R,
    tables: IngestTables,
    predefined: PredefinedGrids,
    sink: Box<dyn DiagnosticSink>,
    options: Grib0Options,
    warned_models: HashSet<(u8, u8)>,
    warned_elements: HashSet<u8>,
    last_message: Option<MessageStructure>,
    last_identifiers: Option<FieldIdentifiers>,
    closed: bool,
}

/// Opens a pipeline over any seekable byte stream with default tables,
/// sink and options.
pub fn from_reader<SR: Read + Seek>(reader: SR) -> Grib0<SeekableGrib0Reader<SR>> {
    Grib0::new(SeekableGrib0Reader::new(reader))
}

/// Opens a pipeline over a GRIB file on disk.
pub fn from_path<P: AsRef<Path>>(
    path: P,
) -> io::Result<Grib0<SeekableGrib0Reader<BufReader<File>>>> {
    let f = File::open(path)?;
    Ok(from_reader(BufReader::new(f)))
}

impl<R: Grib0Read> Grib0<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            tables: IngestTables::default(),
            predefined: PredefinedGrids::edition0(),
            sink: Box::new(TracingSink),
            options: Grib0Options::default(),
            warned_models: HashSet::new(),
            warned_elements: HashSet::new(),
            last_message: None,
            last_identifiers: None,
            closed: false,
        }
    }

    pub fn with_tables(mut self, tables: IngestTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_options(mut self, options: Grib0Options) -> Self {
        self.options = options;
        self
    }

    /// Identifier strings of the most recently decoded field, or `None`
    /// before the first successful decode.
    pub fn identifiers(&self) -> Option<&FieldIdentifiers> {
        self.last_identifiers.as_ref()
    }

    /// Decoded sections of the most recently parsed message, kept for
    /// structure logging even when resolution failed afterwards.
    pub fn inspect(&self) -> Option<&MessageStructure> {
        self.last_message.as_ref()
    }

    /// Decodes the next message. `None` means the stream is exhausted.
    pub fn next_field(&mut self) -> Option<Result<DecodedField, Grib0Error>> {
        if self.closed {
            return None;
        }

        let recovery = match self.reader.seek_sentinel() {
            Ok(Some(pos)) => pos,
            Ok(None) => {
                self.closed = true;
                return None;
            }
            Err(e) => {
                // Either the stream died or it ended inside a sentinel;
                // nothing further can be read in both cases.
                self.closed = true;
                let error = Grib0Error::from(e);
                self.sink.report(DecodeEvent::MessageError {
                    offset: 0,
                    error: error.clone(),
                });
                return Some(Err(error));
            }
        };

        match self.decode_message() {
            Ok(field) => Some(Ok(field)),
            Err(error) => {
                self.sink.report(DecodeEvent::MessageError {
                    offset: recovery,
                    error: error.clone(),
                });
                if error.is_recoverable() {
                    // Resume the search just past this message's
                    // sentinel; the next call walks over the corrupt
                    // region without ever re-matching the same offset.
                    if self.reader.seek(SeekFrom::Start(recovery)).is_err() {
                        self.closed = true;
                    }
                } else {
                    self.closed = true;
                }
                Some(Err(error))
            }
        }
    }

    fn decode_message(&mut self) -> Result<DecodedField, Grib0Error> {
        self.last_message = None;
        let indicator = Indicator {
            edition: 0,
            length: 0,
        };

        let mut pdd = self.reader.read_product_definition()?;

        // CMC error in coding of surface parameters: surface fields
        // arrive as isobaric level 0 hPa.
        if pdd.level.level_type == 100 && pdd.level.combined() == 0 {
            self.sink.report(DecodeEvent::SurfaceCodedAsIsobaric {
                centre_id: pdd.centre_id,
                model_id: pdd.model_id,
            });
            pdd.level.level_type = 1;
        }

        let mut gdd = if pdd.has_grid_description {
            self.reader.read_grid_description()?
        } else {
            self.predefined
                .lookup(pdd.grid_catalogue)
                .ok_or(ParseError::UnknownPredefinedGrid(pdd.grid_catalogue))?
        };

        // CMC coding of lat/lon increments has Di and Dj swapped.
        if pdd.centre_id == 54 && pdd.has_grid_description {
            if let GridDescription::LatLon(grid) = &mut gdd {
                grid.swap_increments();
            }
        }

        if gdd.scanning_mode().has_suspect_low_bits() {
            self.sink.report(DecodeEvent::SuspectScanFlags {
                octet: gdd.scanning_mode().0,
            });
        }

        let bitmap = if pdd.has_bitmap {
            Some(self.reader.read_bitmap()?)
        } else {
            None
        };

        let (bds_header, payload) = self.reader.read_binary_data()?;

        let (ni, nj) = gdd.shape();
        let (di, dj) = gdd.deltas();
        let pole_extra = gdd.pole_extra();
        let (raw, pole_datum) = unpack_samples(
            &bds_header,
            &payload,
            pdd.decimal_scale,
            ni * nj,
            pole_extra,
        )?;

        self.last_message = Some(MessageStructure {
            indicator,
            product: pdd.clone(),
            grid: gdd.clone(),
            bitmap: bitmap.clone(),
            binary: bds_header,
        });

        let data = normalise_scan_order(&raw, ni, nj, di, dj, gdd.scanning_mode());
        let (data, nj) =
            synthesise_pole_row(data, ni, nj, pole_extra, pole_datum.unwrap_or_default());

        let model = self.resolve_model(&pdd);
        let (rtime, vtimeb, vtimee) = self.resolve_timestamps(&pdd)?;
        let (element, units) = self.resolve_element(&pdd, &model);
        let level = self.resolve_level(&pdd)?;
        let map_projection = build_map_projection(&gdd, ni, nj, di, dj)?;
        let component_flag = gdd.component_flag();

        let field = DecodedField {
            model,
            rtime,
            vtimeb,
            vtimee,
            element,
            level,
            units,
            map_projection,
            ni,
            nj,
            data,
            bitmap: bitmap.map(|b| b.bits),
            component_flag,
        };
        self.last_identifiers = Some(field.identifiers());
        Ok(field)
    }

    fn resolve_model(&mut self, pdd: &ProductDefinition) -> String {
        match self.tables.lookup_model(pdd.centre_id, pdd.model_id) {
            Some(label) => label.to_owned(),
            None => {
                if self.warned_models.insert((pdd.centre_id, pdd.model_id)) {
                    self.sink.report(DecodeEvent::UnknownModel {
                        centre_id: pdd.centre_id,
                        model_id: pdd.model_id,
                    });
                }
                format!("gribmodel:{}:{}", pdd.centre_id, pdd.model_id)
            }
        }
    }

    fn resolve_element(&mut self, pdd: &ProductDefinition, source: &str) -> (String, String) {
        match self
            .tables
            .lookup_element(source, pdd.edition, pdd.parameter)
        {
            Some(entry) => (entry.element.clone(), entry.units.clone()),
            None => {
                if self.warned_elements.insert(pdd.parameter) {
                    self.sink.report(DecodeEvent::UnknownElement {
                        parameter: pdd.parameter,
                    });
                }
                (format!("gribelement:{}", pdd.parameter), String::new())
            }
        }
    }

    fn resolve_level(&mut self, pdd: &ProductDefinition) -> Result<String, ResolveError> {
        if let Some(label) = format_coded_level(&pdd.level) {
            return Ok(label);
        }
        self.tables
            .lookup_level(pdd.level.level_type)
            .map(str::to_owned)
            .ok_or(ResolveError::LookupMiss {
                kind: LookupKind::Level,
            })
    }

    /// Builds the run timestamp and the pair of valid timestamps.
    ///
    /// Only forecast time unit 1 (hours) is recognised, with range types
    /// 0 (valid at run + t1), 1 (analysis, t1 must be 0) and 2-5 (ranges
    /// and accumulations from run + t1 to run + t2).
    fn resolve_timestamps(
        &self,
        pdd: &ProductDefinition,
    ) -> Result<(String, String, String), ResolveError> {
        let reference = &pdd.reference;
        let year = full_year(i32::from(reference.year), self.options.century_anchor);
        let jday = jdate(year, i32::from(reference.month), i32::from(reference.day));

        let (mut year, mut jday, mut hour, mut minute) = (
            year,
            jday,
            i32::from(reference.hour),
            i32::from(reference.minute),
        );
        tnorm(&mut year, &mut jday, &mut hour, &mut minute);
        let rtime = build_tstamp(year, jday, hour, minute);

        let valid_at = |offset_hours: u8| {
            let (mut vyear, mut vjday, mut vhour, mut vminute) =
                (year, jday, hour + i32::from(offset_hours), minute);
            tnorm(&mut vyear, &mut vjday, &mut vhour, &mut vminute);
            build_tstamp(vyear, vjday, vhour, vminute)
        };

        let forecast = &pdd.forecast;
        let unsupported = ResolveError::UnsupportedTimeRange {
            range_type: forecast.range_type,
            unit: forecast.unit,
        };
        if forecast.unit != 1 {
            return Err(unsupported);
        }
        let (vtimeb, vtimee) = match forecast.range_type {
            0 => {
                let v = valid_at(forecast.time1);
                (v.clone(), v)
            }
            1 if forecast.time1 == 0 => (rtime.clone(), rtime.clone()),
            2..=5 => (valid_at(forecast.time1), valid_at(forecast.time2)),
            _ => return Err(unsupported),
        };

        Ok((rtime, vtimeb, vtimee))
    }
}

impl<R: Grib0Read> Iterator for Grib0<R> {
    type Item = Result<DecodedField, Grib0Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field()
    }
}
