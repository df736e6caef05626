use crate::{error::ResolveError, grid::GridDescription};

/// Wire angles are millidegrees.
const GRIB_TO_DEGREES: f64 = 1000.0;
/// Wire distances are metres; map units are kilometres.
const GRIB_TO_METERS: f64 = 1000.0;
/// Catalogued pole positions are thousandths of a grid step.
const GRIB_TO_POLE_POS: f64 = 1000.0;
/// Metres per map unit on distance-based projections.
const METERS_PER_UNIT: f32 = 1000.0;

const MAX_LATITUDE: i32 = 90_000;
const MAX_LONGITUDE: i32 = 360_000;

/// Spherical earth radius in kilometres.
const EARTH_RADIUS: f64 = 6371.2;

/// Edition 0 polar stereographic grids are true at the 60-degree
/// latitude closest to the pole of projection; the wire carries no true
/// latitude.
const POLAR_TRUE_LAT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    LatLon,
    PolarStereographic { pole_lat: f32, true_lat: f32 },
    LambertConformal { latin1: f32, latin2: f32 },
    RotatedLatLon { pole_lat: f32, pole_lon: f32, rotation: f32 },
}

/// Map extent and anchoring: (olat, olon) is the geographic location of
/// map position (xorg, yorg) within the [0, xlen] x [0, ylen] rectangle,
/// lref the longitude parallel to the y axis, units the metres per map
/// unit (1 for degree-based maps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDefinition {
    pub olat: f32,
    pub olon: f32,
    pub lref: f32,
    pub xlen: f32,
    pub ylen: f32,
    pub xorg: f32,
    pub yorg: f32,
    pub units: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDefinition {
    pub nx: usize,
    pub ny: usize,
    pub xgrid: f32,
    pub ygrid: f32,
    pub gridlen: f32,
    pub units: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    pub projection: Projection,
    pub map: MapDefinition,
    pub grid: GridDefinition,
}

/// Builds the normalised map projection for a decoded grid.
///
/// `nx`/`ny` are the emitted dimensions, which include any synthesised
/// pole row; `di`/`dj` the signed wire increments. The result has been
/// round-tripped through the textual formatter, so two fields sharing a
/// projection compare bit-identical no matter how their origins were
/// derived.
pub(crate) fn build_map_projection(
    gdd: &GridDescription,
    nx: usize,
    ny: usize,
    di: i32,
    dj: i32,
) -> Result<MapProjection, ResolveError> {
    let mode = gdd.scanning_mode();
    let left = if mode.scans_west() { di < 0 } else { di > 0 };
    let bottom = if mode.scans_north() { dj > 0 } else { dj < 0 };

    let (projection, mut map, grid) = match gdd {
        GridDescription::LatLon(g) => {
            if !g.has_increments() {
                return Err(ResolveError::UnsupportedGridFeature(
                    "no increments given for lat/long grid".to_owned(),
                ));
            }
            let grid = degree_grid(nx, ny, di, dj);
            let map = anchored_map(
                (g.la1 as f64 / GRIB_TO_DEGREES) as f32,
                (g.lo1 as f64 / GRIB_TO_DEGREES) as f32,
                0.0,
                &grid,
                left,
                bottom,
            );
            (Projection::LatLon, map, grid)
        }

        GridDescription::PolarStereographic(g) => {
            let south = g.projection_centre.is_south_pole();
            let (pole_lat, true_lat) = if south {
                (-90.0, -POLAR_TRUE_LAT)
            } else {
                (90.0, POLAR_TRUE_LAT)
            };
            let projection = Projection::PolarStereographic { pole_lat, true_lat };
            let grid = metric_grid(nx, ny, di, dj);
            let lref = (g.lov as f64 / GRIB_TO_DEGREES) as f32;

            let (olat, olon) = if g.la1.abs() <= MAX_LATITUDE && g.lo1.abs() <= MAX_LONGITUDE {
                (
                    (g.la1 as f64 / GRIB_TO_DEGREES) as f32,
                    (g.lo1 as f64 / GRIB_TO_DEGREES) as f32,
                )
            } else {
                // First-point coordinates are absent; recover the origin
                // from the catalogued pole position by inverse-projecting
                // the pole-offset grid point on a provisional projection
                // anchored at the pole.
                let (pole_i, pole_j) = g.pole_position.ok_or_else(|| {
                    ResolveError::UnsupportedGridFeature(
                        "polar stereographic grid without first point or pole position".to_owned(),
                    )
                })?;
                let x = -(pole_i as f64 / GRIB_TO_POLE_POS) * f64::from(grid.xgrid);
                let y = -(pole_j as f64 / GRIB_TO_POLE_POS) * f64::from(grid.ygrid);
                let provisional = anchored_map(pole_lat, 0.0, lref, &grid, left, bottom);
                ps_pos_to_latlon(
                    south,
                    f64::from(lref),
                    x - f64::from(provisional.xorg),
                    y - f64::from(provisional.yorg),
                )
            };

            let map = anchored_map(olat, olon, lref, &grid, left, bottom);
            (projection, map, grid)
        }

        GridDescription::LambertConformal(g) => {
            if g.projection_centre.is_bipolar() {
                return Err(ResolveError::UnsupportedGridFeature(
                    "bipolar form of Lambert conformal grid".to_owned(),
                ));
            }
            if g.la1.abs() > MAX_LATITUDE || g.lo1.abs() > MAX_LONGITUDE {
                return Err(ResolveError::UnsupportedGridFeature(
                    "setting origin from pole location for Lambert conformal grid".to_owned(),
                ));
            }
            let projection = Projection::LambertConformal {
                latin1: (g.latin1 as f64 / GRIB_TO_DEGREES) as f32,
                latin2: (g.latin2 as f64 / GRIB_TO_DEGREES) as f32,
            };
            let grid = metric_grid(nx, ny, di, dj);
            let map = anchored_map(
                (g.la1 as f64 / GRIB_TO_DEGREES) as f32,
                (g.lo1 as f64 / GRIB_TO_DEGREES) as f32,
                (g.lov as f64 / GRIB_TO_DEGREES) as f32,
                &grid,
                left,
                bottom,
            );
            (projection, map, grid)
        }

        GridDescription::RotatedLatLon(g) => {
            if !g.has_increments() {
                return Err(ResolveError::UnsupportedGridFeature(
                    "no increments given for rotated lat/long grid".to_owned(),
                ));
            }
            let projection = Projection::RotatedLatLon {
                pole_lat: (g.lap as f64 / GRIB_TO_DEGREES) as f32,
                pole_lon: (g.lop as f64 / GRIB_TO_DEGREES) as f32,
                rotation: (g.ang_r as f64 / GRIB_TO_DEGREES) as f32,
            };
            let grid = degree_grid(nx, ny, di, dj);
            let map = anchored_map(
                (g.la1 as f64 / GRIB_TO_DEGREES) as f32,
                (g.lo1 as f64 / GRIB_TO_DEGREES) as f32,
                0.0,
                &grid,
                left,
                bottom,
            );
            (projection, map, grid)
        }

        GridDescription::Gaussian(_) => {
            return Err(ResolveError::UnsupportedGridFeature(format!(
                "no map projection for {} grid",
                gdd.short_name()
            )));
        }
    };

    // This projection may be compared with one read back from a metafile
    // later (combining u/v component fields, for instance), so it is
    // written and re-read through the same formatter to make those
    // comparisons exact.
    let projection = parse_projection(&format_projection(&projection))
        .expect("projection formatter output is always parseable");
    map = parse_mapdef(&format_mapdef(&map)).expect("mapdef formatter output is always parseable");

    Ok(MapProjection {
        projection,
        map,
        grid,
    })
}

fn degree_grid(nx: usize, ny: usize, di: i32, dj: i32) -> GridDefinition {
    GridDefinition {
        nx,
        ny,
        xgrid: (di.abs() as f64 / GRIB_TO_DEGREES) as f32,
        ygrid: (dj.abs() as f64 / GRIB_TO_DEGREES) as f32,
        gridlen: 0.0,
        units: 1.0,
    }
}

fn metric_grid(nx: usize, ny: usize, di: i32, dj: i32) -> GridDefinition {
    GridDefinition {
        nx,
        ny,
        xgrid: (di.abs() as f64 / GRIB_TO_METERS) as f32,
        ygrid: (dj.abs() as f64 / GRIB_TO_METERS) as f32,
        gridlen: 0.0,
        units: METERS_PER_UNIT,
    }
}

fn anchored_map(
    olat: f32,
    olon: f32,
    lref: f32,
    grid: &GridDefinition,
    left: bool,
    bottom: bool,
) -> MapDefinition {
    let xlen = grid.xgrid * (grid.nx - 1) as f32;
    let ylen = grid.ygrid * (grid.ny - 1) as f32;
    MapDefinition {
        olat,
        olon,
        lref,
        xlen,
        ylen,
        xorg: if left { 0.0 } else { xlen },
        yorg: if bottom { 0.0 } else { ylen },
        units: grid.units,
    }
}

/// Inverse spherical polar stereographic, true at 60 degrees.
///
/// `x`/`y` are kilometres relative to the pole, with the y axis parallel
/// to the reference longitude: on a north grid a point on that meridian
/// lies at negative y, on a south grid at positive y.
fn ps_pos_to_latlon(south: bool, lref: f64, x: f64, y: f64) -> (f32, f32) {
    let scale = EARTH_RADIUS * (1.0 + f64::from(POLAR_TRUE_LAT).to_radians().sin());
    let r = x.hypot(y);
    if r == 0.0 {
        let pole_lat = if south { -90.0 } else { 90.0 };
        return (pole_lat, normalize_lon(lref) as f32);
    }

    let lat_from_pole = 2.0 * (r / scale).atan().to_degrees();
    let (lat, lon) = if south {
        (-90.0 + lat_from_pole, lref + x.atan2(y).to_degrees())
    } else {
        (90.0 - lat_from_pole, lref + x.atan2(-y).to_degrees())
    };

    (lat as f32, normalize_lon(lon) as f32)
}

fn normalize_lon(lon: f64) -> f64 {
    let mut lon = lon % 360.0;
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon <= -180.0 {
        lon += 360.0;
    }
    lon
}

// Formatting and parsing below quantise every angle and length to three
// decimals, the precision the metafile writer uses, so independently
// derived values collapse to identical bit patterns.

fn format_float(value: f32) -> String {
    format!("{value:.3}")
}

pub fn format_projection(projection: &Projection) -> String {
    match projection {
        Projection::LatLon => "latitude_longitude".to_owned(),
        Projection::PolarStereographic { pole_lat, true_lat } => {
            let pole = if *pole_lat < 0.0 { "south" } else { "north" };
            format!("polar_stereographic {pole} {}", format_float(*true_lat))
        }
        Projection::LambertConformal { latin1, latin2 } => format!(
            "lambert_conformal {} {}",
            format_float(*latin1),
            format_float(*latin2)
        ),
        Projection::RotatedLatLon {
            pole_lat,
            pole_lon,
            rotation,
        } => format!(
            "rotated_latitude_longitude {} {} {}",
            format_float(*pole_lat),
            format_float(*pole_lon),
            format_float(*rotation)
        ),
    }
}

pub fn parse_projection(text: &str) -> Option<Projection> {
    let mut words = text.split_whitespace();
    let name = words.next()?;
    let projection = match name {
        "latitude_longitude" => Projection::LatLon,
        "polar_stereographic" => {
            let pole = words.next()?;
            let true_lat: f32 = words.next()?.parse().ok()?;
            let pole_lat = match pole {
                "north" => 90.0,
                "south" => -90.0,
                _ => return None,
            };
            Projection::PolarStereographic { pole_lat, true_lat }
        }
        "lambert_conformal" => Projection::LambertConformal {
            latin1: words.next()?.parse().ok()?,
            latin2: words.next()?.parse().ok()?,
        },
        "rotated_latitude_longitude" => Projection::RotatedLatLon {
            pole_lat: words.next()?.parse().ok()?,
            pole_lon: words.next()?.parse().ok()?,
            rotation: words.next()?.parse().ok()?,
        },
        _ => return None,
    };
    words.next().is_none().then_some(projection)
}

pub fn format_mapdef(map: &MapDefinition) -> String {
    [
        map.olat, map.olon, map.lref, map.xorg, map.yorg, map.xlen, map.ylen, map.units,
    ]
    .iter()
    .map(|v| format_float(*v))
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn parse_mapdef(text: &str) -> Option<MapDefinition> {
    let values = text
        .split_whitespace()
        .map(|w| w.parse::<f32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let [olat, olon, lref, xorg, yorg, xlen, ylen, units] = values.as_slice() else {
        return None;
    };
    Some(MapDefinition {
        olat: *olat,
        olon: *olon,
        lref: *lref,
        xlen: *xlen,
        ylen: *ylen,
        xorg: *xorg,
        yorg: *yorg,
        units: *units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{
        LatLonGridDefinition, PolarStereographicGridDefinition, PredefinedGrids,
        ProjectionCentreFlag, ScanningMode,
    };

    macro_rules! assert_almost_eq {
        ($a1:expr, $a2:expr, $d:expr) => {
            if $a1 - $a2 > $d || $a2 - $a1 > $d {
                panic!("{} and {} differ by more than {}", $a1, $a2, $d);
            }
        };
    }

    #[test]
    fn lat_lon_map_projection_spans_the_grid() {
        let gdd = GridDescription::LatLon(LatLonGridDefinition {
            ni: 37,
            nj: 36,
            la1: 0,
            lo1: 0,
            resolution_flags: 0x80,
            la2: 90000,
            lo2: 180000,
            di: 5000,
            dj: 2500,
            scanning_mode: ScanningMode(0b01000000),
            pole_extra: 1,
        });
        // One pole row has been added, hence 37 rows.
        let mproj = build_map_projection(&gdd, 37, 37, 5000, 2500).unwrap();

        assert_eq!(mproj.projection, Projection::LatLon);
        assert_eq!(mproj.grid.nx, 37);
        assert_eq!(mproj.grid.ny, 37);
        assert_eq!(mproj.grid.xgrid, 5.0);
        assert_eq!(mproj.grid.ygrid, 2.5);
        assert_eq!(mproj.map.xlen, 180.0);
        assert_eq!(mproj.map.ylen, 90.0);
        assert_eq!((mproj.map.xorg, mproj.map.yorg), (0.0, 0.0));
        assert_eq!((mproj.map.olat, mproj.map.olon), (0.0, 0.0));
    }

    #[test]
    fn lat_lon_without_increments_is_rejected() {
        let gdd = GridDescription::LatLon(LatLonGridDefinition {
            ni: 2,
            nj: 2,
            resolution_flags: 0,
            ..Default::default()
        });
        assert!(matches!(
            build_map_projection(&gdd, 2, 2, 0, 0),
            Err(ResolveError::UnsupportedGridFeature(_))
        ));
    }

    #[test]
    fn polar_origin_recovered_from_pole_position() {
        // NMC grid 5: 53x57, 190.5 km steps, pole at grid (26, 48),
        // oriented along 105W. Its documented origin is near 7.6N 133.4W.
        let grids = PredefinedGrids::edition0();
        let gdd = grids.lookup(5).unwrap();
        let mproj = build_map_projection(&gdd, 53, 57, 190500, 190500).unwrap();

        assert_eq!(
            mproj.projection,
            Projection::PolarStereographic {
                pole_lat: 90.0,
                true_lat: 60.0,
            }
        );
        assert_almost_eq!(mproj.map.olat, 7.65, 0.1);
        assert_almost_eq!(mproj.map.olon, -133.44, 0.1);
        assert_eq!(mproj.map.lref, -105.0);
        assert_eq!(mproj.grid.xgrid, 190.5);
        assert_eq!(mproj.map.units, 1000.0);
    }

    #[test]
    fn polar_origin_kept_when_first_point_is_valid() {
        let gdd = GridDescription::PolarStereographic(PolarStereographicGridDefinition {
            nx: 10,
            ny: 10,
            la1: 40000,
            lo1: -100000,
            component_flags: 0x88,
            lov: -105000,
            dx: 50000,
            dy: 50000,
            projection_centre: ProjectionCentreFlag(0),
            scanning_mode: ScanningMode(0b01000000),
            pole_position: None,
        });
        let mproj = build_map_projection(&gdd, 10, 10, 50000, 50000).unwrap();
        assert_eq!(mproj.map.olat, 40.0);
        assert_eq!(mproj.map.olon, -100.0);
    }

    #[test]
    fn south_polar_inverse_is_symmetric() {
        let (lat_n, lon_n) = ps_pos_to_latlon(false, -105.0, -4953.0, -9144.0);
        let (lat_s, lon_s) = ps_pos_to_latlon(true, -105.0, -4953.0, 9144.0);
        assert_almost_eq!(lat_n, -lat_s, 1e-4);
        assert_almost_eq!(lon_n, lon_s, 1e-4);
    }

    #[test]
    fn pole_position_maps_to_the_pole() {
        let (lat, lon) = ps_pos_to_latlon(false, -105.0, 0.0, 0.0);
        assert_eq!(lat, 90.0);
        assert_eq!(lon, -105.0);
    }

    #[test]
    fn lambert_map_projection_uses_cone_latitudes() {
        let gdd = GridDescription::LambertConformal(crate::grid::LambertGridDefinition {
            nx: 93,
            ny: 65,
            la1: 12026,
            lo1: -136973,
            component_flags: 0x08,
            lov: -94072,
            dx: 82366,
            dy: 82366,
            projection_centre: ProjectionCentreFlag(0),
            scanning_mode: ScanningMode(0b01000000),
            latin1: 36772,
            latin2: 36772,
        });
        let mproj = build_map_projection(&gdd, 93, 65, 82366, 82366).unwrap();
        assert_eq!(
            mproj.projection,
            Projection::LambertConformal {
                latin1: 36.772,
                latin2: 36.772,
            }
        );
        assert_eq!(mproj.map.olat, 12.026);
        assert_eq!(mproj.map.lref, -94.072);
        assert_eq!(mproj.map.units, 1000.0);
        assert_eq!(gdd.component_flag(), 1);
    }

    #[test]
    fn rotated_lat_lon_map_projection_carries_the_rotation() {
        let gdd = GridDescription::RotatedLatLon(crate::grid::RotatedLatLonGridDefinition {
            ni: 107,
            nj: 95,
            la1: -24000,
            lo1: -33500,
            resolution_flags: 0x80,
            di: 250,
            dj: 250,
            scanning_mode: ScanningMode(0b01000000),
            lap: -32500,
            lop: 10000,
            ang_r: -25000,
            ..Default::default()
        });
        let mproj = build_map_projection(&gdd, 107, 95, 250, 250).unwrap();
        assert_eq!(
            mproj.projection,
            Projection::RotatedLatLon {
                pole_lat: -32.5,
                pole_lon: 10.0,
                rotation: -25.0,
            }
        );
        assert_eq!(mproj.grid.xgrid, 0.25);
        assert_eq!(mproj.map.olat, -24.0);
        assert_eq!(mproj.map.units, 1.0);
    }

    #[test]
    fn bipolar_lambert_is_rejected() {
        let gdd = GridDescription::LambertConformal(crate::grid::LambertGridDefinition {
            nx: 2,
            ny: 2,
            projection_centre: ProjectionCentreFlag(0b01000000),
            ..Default::default()
        });
        assert_eq!(
            build_map_projection(&gdd, 2, 2, 1000, 1000),
            Err(ResolveError::UnsupportedGridFeature(
                "bipolar form of Lambert conformal grid".to_owned()
            ))
        );
    }

    #[test]
    fn gaussian_grids_have_no_projection() {
        let gdd = GridDescription::Gaussian(crate::grid::GaussianGridDefinition::default());
        assert!(build_map_projection(&gdd, 1, 1, 0, 0).is_err());
    }

    macro_rules! test_projection_text_round_trip {
        ($(($name:ident, $projection:expr),)*) => ($(
            #[test]
            fn $name() {
                let projection = $projection;
                let text = format_projection(&projection);
                let reparsed = parse_projection(&text).unwrap();
                assert_eq!(format_projection(&reparsed), text);
            }
        )*);
    }

    test_projection_text_round_trip! {
        (projection_text_round_trip_latlon, Projection::LatLon),
        (
            projection_text_round_trip_polar,
            Projection::PolarStereographic { pole_lat: -90.0, true_lat: -60.0 }
        ),
        (
            projection_text_round_trip_lambert,
            Projection::LambertConformal { latin1: 36.772, latin2: 36.772 }
        ),
        (
            projection_text_round_trip_rotated,
            Projection::RotatedLatLon { pole_lat: -32.5, pole_lon: 10.0, rotation: -25.0 }
        ),
    }

    #[test]
    fn mapdef_round_trip_quantises_origins() {
        let map = MapDefinition {
            olat: 7.6480113,
            olon: -133.44343,
            lref: -105.0,
            xlen: 9906.0,
            ylen: 10668.0,
            xorg: 0.0,
            yorg: 0.0,
            units: 1000.0,
        };
        let reparsed = parse_mapdef(&format_mapdef(&map)).unwrap();
        assert_eq!(reparsed.olat, 7.648);
        assert_eq!(reparsed.olon, -133.443);
        let again = parse_mapdef(&format_mapdef(&reparsed)).unwrap();
        assert_eq!(reparsed, again);
    }

    #[test]
    fn identical_projections_compare_equal_across_builds() {
        let grids = PredefinedGrids::edition0();
        let gdd = grids.lookup(5).unwrap();
        let a = build_map_projection(&gdd, 53, 57, 190500, 190500).unwrap();
        let b = build_map_projection(&gdd, 53, 57, 190500, 190500).unwrap();
        assert_eq!(a, b);
    }
}
