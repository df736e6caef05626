use super::{ProjectionCentreFlag, ScanningMode};

/// Lambert conformal grid description.
///
/// Not an Edition 0 wire layout: Section 2 rejects representation 3, so
/// values only arrive from callers driving the projection stage
/// directly. Latin1 and Latin2 are the secant cone intersection
/// latitudes in millidegrees; the bipolar symmetric form is not
/// mappable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LambertGridDefinition {
    pub nx: u32,
    pub ny: u32,
    pub la1: i32,
    pub lo1: i32,
    pub component_flags: u8,
    pub lov: i32,
    pub dx: i32,
    pub dy: i32,
    pub projection_centre: ProjectionCentreFlag,
    pub scanning_mode: ScanningMode,
    pub latin1: i32,
    pub latin2: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_centre_flags_cover_pole_and_bipolar_bits() {
        let grid = LambertGridDefinition {
            projection_centre: ProjectionCentreFlag(0b11000000),
            ..Default::default()
        };
        assert!(grid.projection_centre.is_south_pole());
        assert!(grid.projection_centre.is_bipolar());

        let grid = LambertGridDefinition::default();
        assert!(!grid.projection_centre.is_bipolar());
    }
}
