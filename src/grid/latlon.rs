use super::ScanningMode;
use crate::utils::{read_u16, sign_magnitude_i16, sign_magnitude_i24};

/// Regular latitude/longitude grid (data representation type 0).
///
/// Angles are signed millidegrees; increments are signed millidegrees per
/// step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LatLonGridDefinition {
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
    /// -1 or +1 when one extra packed datum carries the pole row; only
    /// set by the predefined grid catalogue.
    pub pole_extra: i8,
}

impl LatLonGridDefinition {
    /// Whether direction increments are given (resolution flag bit 7).
    /// When clear, increments must come from the predefined catalogue.
    pub fn has_increments(&self) -> bool {
        self.resolution_flags & 0x80 != 0
    }

    /// CMC-origin Edition 0 messages have Di and Dj swapped on the wire.
    pub(crate) fn swap_increments(&mut self) {
        std::mem::swap(&mut self.di, &mut self.dj);
    }

    pub(crate) fn from_payload(buf: &[u8]) -> Self {
        let ni = u32::from(read_u16(buf, 0));
        let nj = u32::from(read_u16(buf, 2));
        let la1 = sign_magnitude_i24(buf, 4);
        let lo1 = sign_magnitude_i24(buf, 7);
        let resolution_flags = buf[10];
        let la2 = sign_magnitude_i24(buf, 11);
        let lo2 = sign_magnitude_i24(buf, 14);
        let di = i32::from(sign_magnitude_i16(buf, 17));
        let dj = i32::from(sign_magnitude_i16(buf, 19));
        let scanning_mode = ScanningMode(buf[21]);
        Self {
            ni,
            nj,
            la1,
            lo1,
            resolution_flags,
            la2,
            lo2,
            di,
            dj,
            scanning_mode,
            pole_extra: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lat_lon_grid_definition_from_payload() {
        // 37x36 north-east quarter hemisphere: origin at the equator and
        // Greenwich, extreme at 90N 180E, 5 x 2.5 degree spacing.
        let buf: Vec<u8> = vec![
            0x00, 0x25, // Ni
            0x00, 0x24, // Nj
            0x00, 0x00, 0x00, // La1
            0x00, 0x00, 0x00, // Lo1
            0x80, // increments given
            0x01, 0x5f, 0x90, // La2 = 90000
            0x02, 0xbf, 0x20, // Lo2 = 180000
            0x13, 0x88, // Di = 5000
            0x09, 0xc4, // Dj = 2500
            0b01000000, // +j scan
        ];
        let actual = LatLonGridDefinition::from_payload(&buf);
        let expected = LatLonGridDefinition {
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
            pole_extra: 0,
        };
        assert_eq!(actual, expected);
        assert!(actual.has_increments());
    }

    #[test]
    fn negative_first_latitude_is_sign_magnitude() {
        let mut buf = vec![0u8; 22];
        buf[4] = 0x81;
        buf[5] = 0x5f;
        buf[6] = 0x90;
        let grid = LatLonGridDefinition::from_payload(&buf);
        assert_eq!(grid.la1, -90000);
    }

    #[test]
    fn increment_swap_exchanges_di_and_dj() {
        let mut grid = LatLonGridDefinition {
            di: 5000,
            dj: 2500,
            ..Default::default()
        };
        grid.swap_increments();
        assert_eq!((grid.di, grid.dj), (2500, 5000));
    }
}
