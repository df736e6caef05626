use crate::grid::ScanningMode;

/// Permutes raw samples from their wire scan order into canonical order:
/// row-major, rows south to north, columns west to east.
///
/// The wire's leading corner follows from the scan-mode bits combined
/// with the signs of the direction increments; together with which index
/// sweeps first that yields eight possible permutations. The input is
/// never mutated; samples are copied into a fresh buffer.
pub(crate) fn normalise_scan_order(
    raw: &[f32],
    ni: usize,
    nj: usize,
    di: i32,
    dj: i32,
    mode: ScanningMode,
) -> Vec<f32> {
    let left = if mode.scans_west() { di < 0 } else { di > 0 };
    let bottom = if mode.scans_north() { dj > 0 } else { dj < 0 };
    let j_first = mode.j_sweeps_first();

    let mut out = Vec::with_capacity(ni * nj);
    for jj in 0..nj {
        for ii in 0..ni {
            let row = if bottom { jj } else { nj - jj - 1 };
            let col = if left { ii } else { ni - ii - 1 };
            let src = if j_first {
                col * nj + row
            } else {
                row * ni + col
            };
            out.push(raw[src]);
        }
    }
    out
}

/// Expands the harvested pole datum into a full row: prepended for
/// `pole_extra` of -1, appended for +1. Runs after normalisation so the
/// new row is the geographically polar one.
pub(crate) fn synthesise_pole_row(
    data: Vec<f32>,
    ni: usize,
    nj: usize,
    pole_extra: i8,
    pole_datum: f32,
) -> (Vec<f32>, usize) {
    match pole_extra {
        0 => (data, nj),
        _ => {
            let mut out = Vec::with_capacity(ni * (nj + 1));
            if pole_extra < 0 {
                out.extend(std::iter::repeat(pole_datum).take(ni));
            }
            out.extend_from_slice(&data);
            if pole_extra > 0 {
                out.extend(std::iter::repeat(pole_datum).take(ni));
            }
            (out, nj + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NI: usize = 4;
    const NJ: usize = 3;

    /// Canonical 4x3 layout where the sample at row j, column i is
    /// `100 * j + i`.
    const CANONICAL: [f32; 12] = [
        0.0, 1.0, 2.0, 3.0, //
        100.0, 101.0, 102.0, 103.0, //
        200.0, 201.0, 202.0, 203.0,
    ];

    macro_rules! test_normalisation_to_canonical_order {
        ($(($name:ident, $mode:expr, $di:expr, $dj:expr, $raw:expr),)*) => ($(
            #[test]
            fn $name() {
                let raw: [f32; 12] = $raw;
                let actual =
                    normalise_scan_order(&raw, NI, NJ, $di, $dj, ScanningMode($mode));
                assert_eq!(actual, CANONICAL);
            }
        )*);
    }

    // Raw arrays are written out by hand from the wire's walk: the scan
    // bits name the walk direction, and the increments' signs say which
    // corner the walk starts in.
    test_normalisation_to_canonical_order! {
        (
            // +i, +j, i first: the wire already reads west-to-east from
            // the south row.
            east_north_scan_is_already_canonical,
            0b01000000, 1, 1,
            [
                0.0, 1.0, 2.0, 3.0, //
                100.0, 101.0, 102.0, 103.0, //
                200.0, 201.0, 202.0, 203.0,
            ]
        ),
        (
            // +i, -j: rows arrive north first.
            east_south_scan_reverses_rows,
            0b00000000, 1, 1,
            [
                200.0, 201.0, 202.0, 203.0, //
                100.0, 101.0, 102.0, 103.0, //
                0.0, 1.0, 2.0, 3.0,
            ]
        ),
        (
            // -i, -j: north-east corner first.
            west_south_scan_reverses_rows_and_columns,
            0b10000000, 1, 1,
            [
                203.0, 202.0, 201.0, 200.0, //
                103.0, 102.0, 101.0, 100.0, //
                3.0, 2.0, 1.0, 0.0,
            ]
        ),
        (
            // -i, +j: south-east corner first.
            west_north_scan_reverses_columns,
            0b11000000, 1, 1,
            [
                3.0, 2.0, 1.0, 0.0, //
                103.0, 102.0, 101.0, 100.0, //
                203.0, 202.0, 201.0, 200.0,
            ]
        ),
        (
            // +i, +j, j first: the wire walks each column south to
            // north.
            east_north_j_first_scan_transposes,
            0b01100000, 1, 1,
            [
                0.0, 100.0, 200.0, //
                1.0, 101.0, 201.0, //
                2.0, 102.0, 202.0, //
                3.0, 103.0, 203.0,
            ]
        ),
        (
            // +i, -j, j first: columns walked north to south.
            east_south_j_first_scan_transposes_and_reverses_rows,
            0b00100000, 1, 1,
            [
                200.0, 100.0, 0.0, //
                201.0, 101.0, 1.0, //
                202.0, 102.0, 2.0, //
                203.0, 103.0, 3.0,
            ]
        ),
        (
            // -i, -j, j first: north-east corner first, columns walked
            // north to south.
            west_south_j_first_scan_reverses_everything,
            0b10100000, 1, 1,
            [
                203.0, 103.0, 3.0, //
                202.0, 102.0, 2.0, //
                201.0, 101.0, 1.0, //
                200.0, 100.0, 0.0,
            ]
        ),
        (
            // -i, +j, j first: east columns first, each walked south to
            // north.
            west_north_j_first_scan_reverses_columns,
            0b11100000, 1, 1,
            [
                3.0, 103.0, 203.0, //
                2.0, 102.0, 202.0, //
                1.0, 101.0, 201.0, //
                0.0, 100.0, 200.0,
            ]
        ),
        (
            // A negative Di flips which end of each row the +i walk
            // started from.
            negative_di_moves_the_start_corner_east,
            0b01000000, -1, 1,
            [
                3.0, 2.0, 1.0, 0.0, //
                103.0, 102.0, 101.0, 100.0, //
                203.0, 202.0, 201.0, 200.0,
            ]
        ),
        (
            // A negative Dj under a -j scan puts the south row first
            // again.
            negative_dj_under_south_scan_is_canonical,
            0b00000000, 1, -1,
            [
                0.0, 1.0, 2.0, 3.0, //
                100.0, 101.0, 102.0, 103.0, //
                200.0, 201.0, 202.0, 203.0,
            ]
        ),
        (
            // Both increments negative under a -i, -j scan: the walk
            // starts in the south-west corner after all.
            negative_deltas_under_west_south_scan_are_canonical,
            0b10000000, -1, -1,
            [
                0.0, 1.0, 2.0, 3.0, //
                100.0, 101.0, 102.0, 103.0, //
                200.0, 201.0, 202.0, 203.0,
            ]
        ),
    }

    #[test]
    fn normalisation_is_idempotent_once_canonical() {
        let raw: [f32; 12] = [
            203.0, 202.0, 201.0, 200.0, //
            103.0, 102.0, 101.0, 100.0, //
            3.0, 2.0, 1.0, 0.0,
        ];
        let once = normalise_scan_order(&raw, NI, NJ, 1, 1, ScanningMode(0b10000000));
        assert_eq!(once, CANONICAL);
        // A second pass in canonical orientation changes nothing.
        let twice = normalise_scan_order(&once, NI, NJ, 1, 1, ScanningMode(0b01000000));
        assert_eq!(once, twice);
    }

    #[test]
    fn pole_row_appends_ni_copies() {
        let (out, nj) = synthesise_pole_row(CANONICAL.to_vec(), NI, NJ, 1, 7.5);
        assert_eq!(nj, NJ + 1);
        assert_eq!(out.len(), NI * (NJ + 1));
        assert!(out[NI * NJ..].iter().all(|v| *v == 7.5));
        assert_eq!(&out[..NI * NJ], CANONICAL);
    }

    #[test]
    fn pole_row_prepends_ni_copies() {
        let (out, nj) = synthesise_pole_row(CANONICAL.to_vec(), NI, NJ, -1, -2.5);
        assert_eq!(nj, NJ + 1);
        assert!(out[..NI].iter().all(|v| *v == -2.5));
        assert_eq!(&out[NI..], CANONICAL);
    }

    #[test]
    fn pole_row_passthrough_when_absent() {
        let (out, nj) = synthesise_pole_row(CANONICAL.to_vec(), NI, NJ, 0, 0.0);
        assert_eq!(nj, NJ);
        assert_eq!(out, CANONICAL);
    }
}
