// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Primary advertising channels.
//!
//! BLE uses 40 RF channels. Channel indices 37, 38 and 39 are the advertising channels and sit on
//! RF channels 0, 12 and 39 so that they avoid the busiest Wi-Fi channels.

use consts::ADV_CHANNELS;

/// One of the three primary advertising channel indices (37, 38 or 39).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingChannel(u8);

impl AdvertisingChannel {
    pub const CH37: Self = Self(37);
    pub const CH38: Self = Self(38);
    pub const CH39: Self = Self(39);

    /// Returns `None` for anything that is not an advertising channel index.
    pub const fn new(index: u8) -> Option<Self> {
        match index {
            37..=39 => Some(Self(index)),
            _ => None,
        }
    }

    /// Channel index, as used by the Link Layer.
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// RF channel this advertising channel index maps to.
    pub const fn rf_channel(&self) -> u8 {
        match self.0 {
            37 => 0,
            38 => 12,
            _ => 39,
        }
    }

    /// Center frequency in MHz.
    pub const fn freq_mhz(&self) -> u16 {
        2402 + self.rf_channel() as u16 * 2
    }

    /// Initial value of the data whitening LFSR (position 0 set, channel index in the low bits).
    pub const fn whitening_iv(&self) -> u8 {
        0b0100_0000 | self.0
    }
}

/// Ordered set of the channels covered by one advertising event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSet([AdvertisingChannel; ADV_CHANNELS.len()]);

impl ChannelSet {
    pub const LEN: usize = ADV_CHANNELS.len();

    /// Channel set in the order every advertising event walks through it.
    pub const fn primary() -> Self {
        Self([
            AdvertisingChannel(ADV_CHANNELS[0]),
            AdvertisingChannel(ADV_CHANNELS[1]),
            AdvertisingChannel(ADV_CHANNELS[2]),
        ])
    }

    pub fn get(&self, cursor: usize) -> Option<AdvertisingChannel> {
        self.0.get(cursor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = AdvertisingChannel> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::primary()
    }
}
