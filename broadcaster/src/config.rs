// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use consts::{ADV_CHANNEL_INTERVAL_MS, ADV_EVENT_INTERVAL_MS};

use crate::channel::ChannelSet;
use crate::Error;

/// Whether the CRC status of a received SCAN_REQ gates the reply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcPolicy {
    /// Answer every SCAN_REQ header, whatever the CRC status.
    #[default]
    Ignore,
    /// Only answer SCAN_REQs received with a valid CRC.
    RequireValid,
}

/// Advertising timings and scan response behaviour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Period of the advertising events, in milliseconds.
    pub event_interval_ms: u32,
    /// Spacing between two channel sends of one advertising event, in milliseconds.
    pub channel_interval_ms: u32,
    pub crc_policy: CrcPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_interval_ms: ADV_EVENT_INTERVAL_MS,
            channel_interval_ms: ADV_CHANNEL_INTERVAL_MS,
            crc_policy: CrcPolicy::default(),
        }
    }
}

impl Config {
    /// An advertising event has to be over before the next one starts, so the event period must be
    /// longer than one channel spacing per advertising channel.
    pub fn validate(&self) -> Result<(), Error> {
        let event_length = self.channel_interval_ms.saturating_mul(ChannelSet::LEN as u32);
        if self.channel_interval_ms == 0 || self.event_interval_ms <= event_length {
            return Err(Error::InvalidTiming);
        }
        Ok(())
    }
}
