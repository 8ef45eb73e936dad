//! PMIC register map (hardware ABI, bit-exact).
//!
//! | Addr | Register | Layout |
//! |------|----------|--------|
//! | 0x30 | LEDEN    | 2 bits per channel: `00` off, `01` always-on, `10` blink |
//! | 0x31 | LED0BRT  | channel 0 current, 8 bit |
//! | 0x32 | LED1BRT  | channel 1 current, 8 bit |
//! | 0x33 | LED2BRT  | channel 2 current, 8 bit |
//! | 0x34 | LED3BRT  | channel 3 current, 8 bit |
//! | 0x36 | LEDRMP   | `(ramp_up << 4) | ramp_down`, 4-bit codes |
//! | 0x38 | LEDBLNK  | `(blink_on << 4) | blink_off`, 4-bit codes |

use crate::channels::{Channel, ChannelMode};

pub const REG_LEDEN: u8 = 0x30;
pub const REG_LED0BRT: u8 = 0x31;
pub const REG_LEDRMP: u8 = 0x36;
pub const REG_LEDBLNK: u8 = 0x38;

/// Maximum per-channel current code.
pub const MAX_CURRENT: u8 = 0xFF;

/// Brightness register address for a channel.
pub const fn brightness_reg(ch: Channel) -> u8 {
    REG_LED0BRT + ch.index()
}

/// Enable-register bits for a channel in the given mode.
pub const fn enable_bits(ch: Channel, mode: ChannelMode) -> u8 {
    mode.bits() << (2 * ch.index())
}

/// Enable-register mask covering one channel's 2-bit field.
pub const fn enable_mask(ch: Channel) -> u8 {
    0x3 << (2 * ch.index())
}

/// Extract a channel's enable field from a raw LEDEN value.
pub const fn enable_field(raw: u8, ch: Channel) -> u8 {
    (raw >> (2 * ch.index())) & 0x3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_registers_are_consecutive() {
        assert_eq!(brightness_reg(Channel::Reserved), 0x31);
        assert_eq!(brightness_reg(Channel::Red), 0x32);
        assert_eq!(brightness_reg(Channel::Green), 0x33);
        assert_eq!(brightness_reg(Channel::Blue), 0x34);
    }

    #[test]
    fn enable_fields_do_not_overlap() {
        let mut combined = 0u8;
        for ch in Channel::ALL {
            let mask = enable_mask(ch);
            assert_eq!(combined & mask, 0);
            combined |= mask;
        }
        assert_eq!(combined, 0xFF);
    }

    #[test]
    fn enable_bits_land_in_their_field() {
        let bits = enable_bits(Channel::Blue, ChannelMode::Blink);
        assert_eq!(bits, 0b10 << 6);
        assert_eq!(enable_field(bits, Channel::Blue), ChannelMode::Blink.bits());
        assert_eq!(enable_field(bits, Channel::Red), 0);
    }
}
