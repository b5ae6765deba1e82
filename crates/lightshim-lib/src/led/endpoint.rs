//! Physical LED endpoints and sets of them.
//!
//! The indicator cluster has red, green and blue channels, each replicated in
//! up to three stacked positions: primary, `-1` and `-2`.

use std::fmt;

/// Color channel of a physical LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// One physical brightness endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalLed {
    Red0,
    Green0,
    Blue0,
    Red1,
    Green1,
    Blue1,
    Red2,
    Green2,
    Blue2,
}

impl PhysicalLed {
    pub const ALL: [PhysicalLed; 9] = [
        PhysicalLed::Red0,
        PhysicalLed::Green0,
        PhysicalLed::Blue0,
        PhysicalLed::Red1,
        PhysicalLed::Green1,
        PhysicalLed::Blue1,
        PhysicalLed::Red2,
        PhysicalLed::Green2,
        PhysicalLed::Blue2,
    ];

    /// The endpoint for `channel` at stack `position` (0, 1 or 2).
    pub fn at(channel: Channel, position: usize) -> Option<PhysicalLed> {
        let idx = position.checked_mul(3)? + channel as usize;
        Self::ALL.get(idx).copied()
    }

    /// The primary (unsuffixed) endpoint of a channel.
    pub fn primary(channel: Channel) -> PhysicalLed {
        match channel {
            Channel::Red => PhysicalLed::Red0,
            Channel::Green => PhysicalLed::Green0,
            Channel::Blue => PhysicalLed::Blue0,
        }
    }

    pub fn channel(self) -> Channel {
        Channel::ALL[self as usize % 3]
    }

    /// Stack position: 0 = primary, 1 = `-1`, 2 = `-2`.
    pub fn position(self) -> usize {
        self as usize / 3
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for PhysicalLed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            0 => write!(f, "{}", self.channel().name()),
            n => write!(f, "{}-{n}", self.channel().name()),
        }
    }
}

/// A set of physical endpoints participating in one write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedSet(u16);

impl LedSet {
    pub const EMPTY: LedSet = LedSet(0);

    /// Every endpoint, all three positions.
    pub fn all() -> Self {
        Self::from_leds(&PhysicalLed::ALL)
    }

    pub fn from_leds(leds: &[PhysicalLed]) -> Self {
        LedSet(leds.iter().fold(0, |acc, led| acc | led.bit()))
    }

    pub fn with(self, led: PhysicalLed) -> Self {
        LedSet(self.0 | led.bit())
    }

    pub fn contains(self, led: PhysicalLed) -> bool {
        self.0 & led.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = PhysicalLed> {
        PhysicalLed::ALL.into_iter().filter(move |&l| self.contains(l))
    }
}

impl FromIterator<PhysicalLed> for LedSet {
    fn from_iter<I: IntoIterator<Item = PhysicalLed>>(iter: I) -> Self {
        iter.into_iter().fold(LedSet::EMPTY, LedSet::with)
    }
}
