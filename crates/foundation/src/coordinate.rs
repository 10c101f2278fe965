/// Geographic coordinate in WGS84 degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// Bit-exact canonical bytes, for hashing a coordinate into an identifier.
    ///
    /// Uses IEEE-754 bit patterns rather than formatted text so that the same
    /// `f64` always hashes the same way.
    pub fn canonical_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.lat.to_bits().to_le_bytes());
        out[8..].copy_from_slice(&self.lon.to_bits().to_le_bytes());
        out
    }
}
