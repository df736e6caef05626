use std::collections::HashMap;

use super::{
    GridDescription, LatLonGridDefinition, PolarStereographicGridDefinition,
    ProjectionCentreFlag, ScanningMode,
};

/// Catalogue of grids a message may reference by number instead of
/// carrying a Grid Description Block.
///
/// Numbers and values follow the NMC/international-exchange tables of the
/// 1989 Edition 0 document. Pole coordinates are 0-based grid positions
/// in thousandths of a step.
#[derive(Debug, Clone)]
pub struct PredefinedGrids {
    latlon: HashMap<u8, LatLonGridDefinition>,
    polar: HashMap<u8, PolarStereographicGridDefinition>,
}

// {catalogue, ni, nj, la1, lo1, la2, lo2, di, dj, pole_extra}
const LATLON_GRIDS: &[(u8, u32, u32, i32, i32, i32, i32, i32, i32, i8)] = &[
    // 5 x 2.5 degree quarter hemispheres
    (21, 37, 36, 0, 0, 90000, 180000, 5000, 2500, 1),
    (22, 37, 36, 0, 180000, 90000, 0, 5000, 2500, 1),
    (23, 37, 36, -90000, 0, 0, 180000, 5000, 2500, -1),
    (24, 37, 36, -90000, 180000, 0, 0, 5000, 2500, -1),
    // 5 x 5 degree hemispheres
    (25, 72, 18, 0, 0, 90000, 355000, 5000, 5000, 1),
    (26, 72, 18, -90000, 0, 0, 355000, 5000, 5000, -1),
    // 2 x 2 degree quarter hemispheres
    (61, 91, 45, 0, 0, 90000, 180000, 2000, 2000, 1),
    (62, 91, 45, 0, 180000, 90000, 0, 2000, 2000, 1),
    (63, 91, 45, -90000, 0, 0, 180000, 2000, 2000, -1),
    (64, 91, 45, -90000, 180000, 0, 0, 2000, 2000, -1),
    // NMC 2.5 degree hemispheres
    (29, 145, 37, 0, 0, 90000, 360000, 2500, 2500, 0),
    (30, 145, 37, -90000, 0, 0, 360000, 2500, 2500, 0),
    // NMC 2 degree hemispheres
    (33, 181, 46, 0, 0, 90000, 360000, 2000, 2000, 0),
    (34, 181, 46, -90000, 0, 0, 360000, 2000, 2000, 0),
];

// {catalogue, nx, ny, lov, dx, dy, south_pole, pole_i, pole_j}
const POLAR_GRIDS: &[(u8, u32, u32, i32, i32, i32, bool, i32, i32)] = &[
    (5, 53, 57, -105000, 190500, 190500, false, 26000, 48000),
    (6, 53, 45, -105000, 190500, 190500, false, 26000, 48000),
    (27, 65, 65, -80000, 381000, 381000, false, 32000, 32000),
    (28, 65, 65, 100000, 381000, 381000, true, 32000, 32000),
    (100, 83, 83, -105000, 91452, 91452, false, 39500, 87500),
    (101, 113, 91, -105000, 91452, 91452, false, 57500, 91500),
    (103, 65, 56, -105000, 91452, 91452, false, 24500, 83500),
];

// Catalogue entries scan +i, +j, i first.
const CATALOGUE_SCAN_MODE: ScanningMode = ScanningMode(0b01000000);

// First-point coordinates are not catalogued for polar grids; the origin
// comes from the pole position instead.
const NO_COORD_LAT: i32 = -99999;
const NO_COORD_LON: i32 = -999999;

impl PredefinedGrids {
    pub fn edition0() -> Self {
        let latlon = LATLON_GRIDS
            .iter()
            .map(
                |&(num, ni, nj, la1, lo1, la2, lo2, di, dj, pole_extra)| {
                    (
                        num,
                        LatLonGridDefinition {
                            ni,
                            nj,
                            la1,
                            lo1,
                            resolution_flags: 0x80,
                            la2,
                            lo2,
                            di,
                            dj,
                            scanning_mode: CATALOGUE_SCAN_MODE,
                            pole_extra,
                        },
                    )
                },
            )
            .collect();
        let polar = POLAR_GRIDS
            .iter()
            .map(|&(num, nx, ny, lov, dx, dy, south, pole_i, pole_j)| {
                (
                    num,
                    PolarStereographicGridDefinition {
                        nx,
                        ny,
                        la1: NO_COORD_LAT,
                        lo1: NO_COORD_LON,
                        component_flags: 0x88,
                        lov,
                        dx,
                        dy,
                        projection_centre: ProjectionCentreFlag(if south { 0x80 } else { 0 }),
                        scanning_mode: CATALOGUE_SCAN_MODE,
                        pole_position: Some((pole_i, pole_j)),
                    },
                )
            })
            .collect();
        Self { latlon, polar }
    }

    /// Looks up a catalogue number, trying the lat/lon table first and
    /// the polar stereographic table second.
    pub fn lookup(&self, catalogue: u8) -> Option<GridDescription> {
        if let Some(grid) = self.latlon.get(&catalogue) {
            return Some(GridDescription::LatLon(grid.clone()));
        }
        self.polar
            .get(&catalogue)
            .map(|grid| GridDescription::PolarStereographic(grid.clone()))
    }
}

impl Default for PredefinedGrids {
    fn default() -> Self {
        Self::edition0()
    }
}
