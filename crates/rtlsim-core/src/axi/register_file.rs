use crate::axi::decode::merge_strobe;
use crate::config::DataWidth;

/// Fixed-size array of fixed-width registers, all zero at power-up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    width: DataWidth,
    registers: Box<[u64]>,
}

impl RegisterFile {
    /// Allocates `count` zeroed registers of the given width.
    #[must_use]
    pub fn new(width: DataWidth, count: usize) -> Self {
        Self {
            width,
            registers: vec![0; count].into_boxed_slice(),
        }
    }

    /// Number of registers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.registers.len()
    }

    /// Returns true when the array holds no registers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Register width.
    #[must_use]
    pub const fn width(&self) -> DataWidth {
        self.width
    }

    /// Reads a register, or `None` past the end of the array.
    #[must_use]
    pub fn read(&self, index: usize) -> Option<u64> {
        self.registers.get(index).copied()
    }

    /// Applies a byte-masked write and returns the previous contents.
    ///
    /// Returns `None`, leaving the array untouched, when `index` is past the
    /// end.
    pub fn write_masked(&mut self, index: usize, data: u64, strobe: u8) -> Option<u64> {
        let width = self.width;
        let slot = self.registers.get_mut(index)?;
        let previous = *slot;
        *slot = merge_strobe(width, previous, data, strobe);
        Some(previous)
    }

    /// All registers in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.registers
    }
}

#[cfg(test)]
mod tests {
    use super::RegisterFile;
    use crate::config::DataWidth;

    #[test]
    fn new_file_is_zeroed() {
        let file = RegisterFile::new(DataWidth::Bits32, 4);
        assert_eq!(file.len(), 4);
        assert!(!file.is_empty());
        assert!(file.as_slice().iter().all(|value| *value == 0));
    }

    #[test]
    fn masked_write_returns_previous_value() {
        let mut file = RegisterFile::new(DataWidth::Bits32, 2);
        assert_eq!(file.write_masked(1, 0xDEAD_BEEF, 0xF), Some(0));
        assert_eq!(file.write_masked(1, 0x0000_0011, 0x1), Some(0xDEAD_BEEF));
        assert_eq!(file.read(1), Some(0xDEAD_BE11));
    }

    #[test]
    fn values_are_truncated_to_register_width() {
        let mut file = RegisterFile::new(DataWidth::Bits32, 1);
        file.write_masked(0, u64::MAX, 0xFF);
        assert_eq!(file.read(0), Some(0xFFFF_FFFF));
    }

    #[test]
    fn out_of_range_access_is_rejected_without_side_effects() {
        let mut file = RegisterFile::new(DataWidth::Bits32, 2);
        assert_eq!(file.read(2), None);
        assert_eq!(file.write_masked(2, 1, 0xF), None);
        assert_eq!(file.as_slice(), &[0, 0]);
    }
}
