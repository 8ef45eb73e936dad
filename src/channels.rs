//! Channel state store.
//!
//! Tracks the commanded enable mode and brightness of each of the four
//! hardware channels. Index 0 is wired to nothing on current boards and
//! stays reserved; the policy engine only ever drives Red/Green/Blue.
//!
//! The store mirrors what was last written to the PMIC, not what the PMIC
//! reports. It is mutated only by [`LedService`](crate::app::service::LedService),
//! and only after the corresponding register sequence completed.

/// One independently controllable light source.
///
/// The discriminant is the hardware channel index: brightness register
/// `LED0BRT + n` and enable field `2*n` both derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// Unpopulated fourth emitter. Never driven by the pattern engine.
    Reserved = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
}

impl Channel {
    /// Hardware channel index (0-3).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// All four channels in hardware order.
    pub const ALL: [Channel; 4] = [Channel::Reserved, Channel::Red, Channel::Green, Channel::Blue];

    /// The three colour channels the policy engine drives.
    pub const COLOURS: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Enable-field encoding for one channel (2 bits in the enable register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChannelMode {
    #[default]
    Disabled = 0,
    AlwaysOn = 1,
    Blink = 2,
}

impl ChannelMode {
    /// Raw 2-bit field value.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Commanded state of a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    pub brightness: u8,
    pub mode: ChannelMode,
}

/// State of all four channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelBank {
    states: [ChannelState; 4],
}

impl ChannelBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ch: Channel) -> ChannelState {
        self.states[ch.index() as usize]
    }

    pub fn set(&mut self, ch: Channel, brightness: u8, mode: ChannelMode) {
        self.states[ch.index() as usize] = ChannelState { brightness, mode };
    }

    /// True when every colour channel is disabled at zero brightness.
    pub fn all_dark(&self) -> bool {
        Channel::COLOURS.iter().all(|&ch| {
            let s = self.get(ch);
            s.mode == ChannelMode::Disabled && s.brightness == 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_starts_dark() {
        let bank = ChannelBank::new();
        assert!(bank.all_dark());
        for ch in Channel::ALL {
            assert_eq!(bank.get(ch), ChannelState::default());
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut bank = ChannelBank::new();
        bank.set(Channel::Blue, 0x14, ChannelMode::Blink);
        let s = bank.get(Channel::Blue);
        assert_eq!(s.brightness, 0x14);
        assert_eq!(s.mode, ChannelMode::Blink);
        assert!(!bank.all_dark());
    }

    #[test]
    fn reserved_channel_does_not_affect_all_dark() {
        let mut bank = ChannelBank::new();
        bank.set(Channel::Reserved, 0xFF, ChannelMode::AlwaysOn);
        assert!(bank.all_dark());
    }

    #[test]
    fn channel_indices_match_hardware_order() {
        assert_eq!(Channel::Reserved.index(), 0);
        assert_eq!(Channel::Red.index(), 1);
        assert_eq!(Channel::Green.index(), 2);
        assert_eq!(Channel::Blue.index(), 3);
    }
}
