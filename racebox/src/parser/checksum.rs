use crate::ParserError;

/// Two-accumulator (8-bit Fletcher) checksum used by every RaceBox frame.
///
/// The checksum covers class, message id, length and payload, never the sync marker.
/// It can be fed incrementally or computed in one shot with [`ChecksumCalc::compute`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumCalc {
    ck_a: u8,
    ck_b: u8,
}

impl ChecksumCalc {
    pub const fn new() -> Self {
        Self { ck_a: 0, ck_b: 0 }
    }

    /// One-shot checksum over `bytes`, returned as `(CK_A, CK_B)`
    pub const fn compute(bytes: &[u8]) -> (u8, u8) {
        let mut calc = Self::new();
        calc.update(bytes);
        calc.result()
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.ck_a = self.ck_a.wrapping_add(byte);
        self.ck_b = self.ck_b.wrapping_add(self.ck_a);
    }

    /// Get the current checksum result
    pub const fn result(self) -> (u8, u8) {
        (self.ck_a, self.ck_b)
    }

    pub const fn is_valid(&self, received_ck_a: u8, received_ck_b: u8) -> bool {
        self.ck_a == received_ck_a && self.ck_b == received_ck_b
    }

    /// Validate checksum and return result
    pub const fn validate_result(
        self,
        received_ck_a: u8,
        received_ck_b: u8,
    ) -> Result<(), ParserError> {
        if self.is_valid(received_ck_a, received_ck_b) {
            Ok(())
        } else {
            Err(ParserError::InvalidChecksum {
                expect: u16::from_le_bytes([received_ck_a, received_ck_b]),
                got: u16::from_le_bytes([self.ck_a, self.ck_b]),
            })
        }
    }
}
