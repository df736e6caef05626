use super::ScanningMode;
use crate::utils::{read_u16, sign_magnitude_i16, sign_magnitude_i24};

/// Gaussian latitude/longitude grid (data representation type 4).
///
/// The octets that carry Dj on a regular grid carry N, the number of
/// parallels between a pole and the equator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GaussianGridDefinition {
    pub ni: u32,
    pub nj: u32,
    pub la1: i32,
    pub lo1: i32,
    pub resolution_flags: u8,
    pub la2: i32,
    pub lo2: i32,
    pub di: i32,
    pub n: i32,
    pub scanning_mode: ScanningMode,
}

impl GaussianGridDefinition {
    pub(crate) fn from_payload(buf: &[u8]) -> Self {
        let ni = u32::from(read_u16(buf, 0));
        let nj = u32::from(read_u16(buf, 2));
        let la1 = sign_magnitude_i24(buf, 4);
        let lo1 = sign_magnitude_i24(buf, 7);
        let resolution_flags = buf[10];
        let la2 = sign_magnitude_i24(buf, 11);
        let lo2 = sign_magnitude_i24(buf, 14);
        let di = i32::from(sign_magnitude_i16(buf, 17));
        let n = i32::from(read_u16(buf, 19));
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
            n,
            scanning_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_grid_definition_from_payload() {
        let buf: Vec<u8> = vec![
            0x00, 0xc0, // Ni = 192
            0x00, 0x30, // Nj = 48
            0x81, 0x5d, 0x1f, // La1 = -89375
            0x00, 0x00, 0x00, // Lo1
            0x80, //
            0x01, 0x5d, 0x1f, // La2 = 89375
            0x05, 0x77, 0xd8, // Lo2 = 358360
            0x07, 0x53, // Di = 1875
            0x00, 0x18, // N = 24
            0b01000000,
        ];
        let actual = GaussianGridDefinition::from_payload(&buf);
        let expected = GaussianGridDefinition {
            ni: 192,
            nj: 48,
            la1: -89375,
            lo1: 0,
            resolution_flags: 0x80,
            la2: 89375,
            lo2: 358360,
            di: 1875,
            n: 24,
            scanning_mode: ScanningMode(0b01000000),
        };
        assert_eq!(actual, expected);
    }
}
