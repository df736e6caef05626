use std::io::{self, Read, Seek, SeekFrom};

use crate::{
    datatypes::{BinaryDataHeader, Bitmap, ForecastSpec, Level, ProductDefinition, ReferenceTime},
    error::ParseError,
    grid::{
        DataRepresentation, GaussianGridDefinition, GridDescription, LatLonGridDefinition,
        PolarStereographicGridDefinition,
    },
    utils::{read_u16, read_u24},
};

const SENTINEL: &[u8] = b"GRIB";
const TRAILER: &[u8] = b"7777";

/// Decoded octets of the Product Definition Block; longer blocks carry
/// padding that is consumed and discarded.
const PDB_DECODED_LEN: u32 = 24;
const PDB_MAX_LEN: u32 = 1024;
const GDB_MIN_LEN: u32 = 32;
const GDB_MAX_LEN: u32 = 1024;
const BMS_MIN_LEN: u32 = 6;
const BDS_MIN_LEN: u32 = 11;

/// Byte-level access to an Edition 0 stream: sentinel search plus one
/// reader per section. Sections are length-prefixed and consumed
/// exactly, so a failed message never leaves the stream misaligned
/// beyond its recovery point.
pub trait Grib0Read: Read + Seek {
    /// Scans forward to the next `GRIB` sentinel. Returns the stream
    /// position just past the sentinel (the message's recovery point),
    /// or `None` on a clean end of input. End of input inside a partial
    /// match is an error.
    fn seek_sentinel(&mut self) -> Result<Option<u64>, ParseError>;

    fn read_product_definition(&mut self) -> Result<ProductDefinition, ParseError>;
    fn read_grid_description(&mut self) -> Result<GridDescription, ParseError>;
    fn read_bitmap(&mut self) -> Result<Bitmap, ParseError>;
    /// Reads the BDS header and packed payload, then checks the `7777`
    /// trailer that closes the message.
    fn read_binary_data(&mut self) -> Result<(BinaryDataHeader, Vec<u8>), ParseError>;
}

pub struct SeekableGrib0Reader<R> {
    reader: R,
}

impl<R> SeekableGrib0Reader<R> {
    pub fn new(r: R) -> Self {
        Self { reader: r }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Read for SeekableGrib0Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.reader.read_exact(buf)
    }
}

impl<S: Seek> Seek for SeekableGrib0Reader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}

/// Distinguishes a short read (recoverable, the stream simply ended
/// inside `section`) from an underlying I/O failure (fatal).
fn eof_as(section: &'static str) -> impl Fn(io::Error) -> ParseError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ParseError::UnexpectedEndOfData(section)
        } else {
            ParseError::from(e)
        }
    }
}

fn read_section_body<R: Read>(
    reader: &mut R,
    length: u32,
    already_read: u32,
    section: &'static str,
) -> Result<Vec<u8>, ParseError> {
    let mut body = vec![0; (length - already_read) as usize];
    reader.read_exact(&mut body).map_err(eof_as(section))?;
    Ok(body)
}

impl<R: Read + Seek> Grib0Read for SeekableGrib0Reader<R> {
    fn seek_sentinel(&mut self) -> Result<Option<u64>, ParseError> {
        let mut matched = 0;
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    return if matched == 0 {
                        Ok(None)
                    } else {
                        Err(ParseError::SentinelNotFound)
                    };
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::from(e)),
            }

            if byte[0] == SENTINEL[matched] {
                matched += 1;
            } else {
                // Restart the match, allowing the mismatched byte to
                // begin a new sentinel.
                matched = usize::from(byte[0] == SENTINEL[0]);
            }

            if matched == SENTINEL.len() {
                let pos = self.reader.stream_position().map_err(ParseError::from)?;
                return Ok(Some(pos));
            }
        }
    }

    fn read_product_definition(&mut self) -> Result<ProductDefinition, ParseError> {
        let mut head = [0u8; 3];
        self.reader
            .read_exact(&mut head)
            .map_err(eof_as("Product Definition Block"))?;
        let length = read_u24(&head, 0);
        if !(PDB_DECODED_LEN..=PDB_MAX_LEN).contains(&length) {
            return Err(ParseError::SectionLengthOutOfRange { section: 1, length });
        }

        let buf = read_section_body(self, length, 3, "Product Definition Block")?;
        Ok(ProductDefinition {
            length,
            edition: buf[0],
            centre_id: buf[1],
            model_id: buf[2],
            grid_catalogue: buf[3],
            has_grid_description: buf[4] & 0x80 != 0,
            has_bitmap: buf[4] & 0x40 != 0,
            parameter: buf[5],
            level: Level {
                level_type: buf[6],
                top: buf[7],
                bottom: buf[8],
            },
            reference: ReferenceTime {
                year: buf[9],
                month: buf[10],
                day: buf[11],
                hour: buf[12],
                minute: buf[13],
            },
            forecast: ForecastSpec {
                unit: buf[14],
                time1: buf[15],
                time2: buf[16],
                range_type: buf[17],
                nb_averaged: read_u16(&buf, 18),
                nb_missing: buf[20],
            },
            decimal_scale: 0,
        })
    }

    fn read_grid_description(&mut self) -> Result<GridDescription, ParseError> {
        let mut head = [0u8; 3];
        self.reader
            .read_exact(&mut head)
            .map_err(eof_as("Grid Description Block"))?;
        let length = read_u24(&head, 0);
        if !(GDB_MIN_LEN..=GDB_MAX_LEN).contains(&length) {
            return Err(ParseError::SectionLengthOutOfRange { section: 2, length });
        }

        let buf = read_section_body(self, length, 3, "Grid Description Block")?;
        // buf[0] is nv, buf[1] pv_or_pl; neither is used in Edition 0.
        let representation = buf[2];
        let payload = &buf[3..];

        // Only the three Edition 0 wire layouts are accepted here; any
        // other code, Lambert conformal and rotated grids included, fails
        // the message.
        let representation = DataRepresentation::try_from(representation)
            .map_err(|_| ParseError::UnknownRepresentation(representation))?;

        Ok(match representation {
            DataRepresentation::LatLon => {
                GridDescription::LatLon(LatLonGridDefinition::from_payload(payload))
            }
            DataRepresentation::Gaussian => {
                GridDescription::Gaussian(GaussianGridDefinition::from_payload(payload))
            }
            DataRepresentation::PolarStereographic => GridDescription::PolarStereographic(
                PolarStereographicGridDefinition::from_payload(payload),
            ),
        })
    }

    fn read_bitmap(&mut self) -> Result<Bitmap, ParseError> {
        let mut head = [0u8; 6];
        self.reader
            .read_exact(&mut head)
            .map_err(eof_as("Bit Map Section"))?;
        let length = read_u24(&head, 0);
        if length < BMS_MIN_LEN {
            return Err(ParseError::SectionLengthOutOfRange { section: 3, length });
        }

        let bits = read_section_body(self, length, 6, "Bit Map Section")?;
        Ok(Bitmap {
            length,
            unused_bits: head[3],
            table: read_u16(&head, 4),
            bits,
        })
    }

    fn read_binary_data(&mut self) -> Result<(BinaryDataHeader, Vec<u8>), ParseError> {
        let mut head = [0u8; 11];
        self.reader
            .read_exact(&mut head)
            .map_err(eof_as("Binary Data Section"))?;
        let header = BinaryDataHeader::from_buf(&head);
        if header.length < BDS_MIN_LEN {
            return Err(ParseError::SectionLengthOutOfRange {
                section: 4,
                length: header.length,
            });
        }

        let payload = read_section_body(self, header.length, 11, "Binary Data Section")?;

        let mut trailer = [0u8; 4];
        self.reader
            .read_exact(&mut trailer)
            .map_err(eof_as("'7777' trailer"))?;
        if trailer != TRAILER {
            return Err(ParseError::TrailerMismatch);
        }

        Ok((header, payload))
    }
}
