//! Address decode and byte-lane merge for the register file.

use crate::config::{AxiConfig, DataWidth};

/// Result of decoding a bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodedAddress {
    /// Address selects an existing register.
    Register(usize),
    /// Address selects an index past the end of the array.
    OutOfRange(u64),
}

/// Decodes a byte address into a register index.
///
/// The address is masked to the configured bus width and the byte-offset
/// bits are dropped; the remaining bits form the index.
#[must_use]
pub fn decode_index(config: &AxiConfig, addr: u64) -> DecodedAddress {
    let index = (addr & config.address_mask()) >> config.data_width.byte_offset_bits();
    match usize::try_from(index) {
        Ok(index) if index < config.register_count => DecodedAddress::Register(index),
        _ => DecodedAddress::OutOfRange(index),
    }
}

/// Replaces the strobed byte lanes of `current` with those of `data`.
///
/// Strobe bits beyond the bus width are ignored.
#[must_use]
pub fn merge_strobe(width: DataWidth, current: u64, data: u64, strobe: u8) -> u64 {
    let lane_mask = (0..width.byte_lanes())
        .filter(|lane| strobe & (1 << lane) != 0)
        .fold(0_u64, |mask, lane| mask | (0xFF_u64 << (lane * 8)));
    ((current & !lane_mask) | (data & lane_mask)) & width.value_mask()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{decode_index, merge_strobe, DecodedAddress};
    use crate::config::{AxiConfig, DataWidth};

    #[test]
    fn word_addresses_map_to_consecutive_indices() {
        let config = AxiConfig::default();
        assert_eq!(decode_index(&config, 0x0), DecodedAddress::Register(0));
        assert_eq!(decode_index(&config, 0x4), DecodedAddress::Register(1));
        assert_eq!(decode_index(&config, 0xC), DecodedAddress::Register(3));
    }

    #[test]
    fn byte_offset_bits_are_ignored() {
        let config = AxiConfig::default();
        assert_eq!(decode_index(&config, 0x7), DecodedAddress::Register(1));
    }

    #[test]
    fn indices_past_the_array_are_out_of_range() {
        let config = AxiConfig::default();
        assert_eq!(decode_index(&config, 0x10), DecodedAddress::OutOfRange(4));
        assert_eq!(decode_index(&config, 0x40), DecodedAddress::OutOfRange(16));
    }

    #[test]
    fn address_bits_above_bus_width_are_dropped() {
        let config = AxiConfig {
            addr_width_bits: 8,
            ..AxiConfig::default()
        };
        assert_eq!(decode_index(&config, 0x1_04), DecodedAddress::Register(1));
    }

    #[test]
    fn sixty_four_bit_bus_uses_three_offset_bits() {
        let config = AxiConfig {
            data_width: DataWidth::Bits64,
            ..AxiConfig::default()
        };
        assert_eq!(decode_index(&config, 0x8), DecodedAddress::Register(1));
        assert_eq!(decode_index(&config, 0x4), DecodedAddress::Register(0));
    }

    #[test]
    fn merge_replaces_only_strobed_lanes() {
        let merged = merge_strobe(DataWidth::Bits32, 0x1122_3344, 0xAABB_CCDD, 0b0101);
        assert_eq!(merged, 0x11BB_33DD);
    }

    #[test]
    fn strobe_bits_past_the_bus_are_ignored() {
        let merged = merge_strobe(DataWidth::Bits32, 0, 0xFFFF_FFFF_FFFF_FFFF, 0xF0);
        assert_eq!(merged, 0);
    }

    proptest! {
        #[test]
        fn unstrobed_lanes_keep_their_bytes(current: u64, data: u64, strobe: u8) {
            let merged = merge_strobe(DataWidth::Bits64, current, data, strobe);
            for lane in 0..8_u32 {
                let shift = lane * 8;
                let expected = if strobe & (1 << lane) != 0 { data } else { current };
                prop_assert_eq!((merged >> shift) & 0xFF, (expected >> shift) & 0xFF);
            }
        }
    }
}
