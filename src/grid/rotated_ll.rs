use super::ScanningMode;

/// Rotated latitude/longitude grid description.
///
/// Not an Edition 0 wire layout: Section 2 rejects representation 10,
/// so values only arrive from callers driving the projection stage
/// directly. The pole of rotation and the rotation angle are signed
/// millidegrees, like every other angle here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RotatedLatLonGridDefinition {
    pub ni: u32,
    pub nj: u32,
    pub la1: i32,
    pub lo1: i32,
    pub resolution_flags: u8,
    pub la2: i32,
    pub lo2: i32,
    pub di: i32,
    pub dj: i32,
    pub scanning_mode: ScanningMode,
    pub lap: i32,
    pub lop: i32,
    pub ang_r: i32,
}

impl RotatedLatLonGridDefinition {
    pub fn has_increments(&self) -> bool {
        self.resolution_flags & 0x80 != 0
    }
}
