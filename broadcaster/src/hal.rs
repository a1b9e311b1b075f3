// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hardware collaborators driven by the broadcaster.
//!
//! Implementations must return without blocking: every call is made from event dispatch, and
//! anything slow has to be deferred to the caller's event loop.

use crate::channel::AdvertisingChannel;

/// Radio transceiver in BLE 1 Mbit mode.
pub trait Radio {
    /// Starts transmitting `pdu` (header included) on `channel`.
    ///
    /// When `rx_after_tx` is set the radio listens on the same channel once the packet is out, and
    /// hands whatever it receives back as [`Event::PacketReceived`](crate::Event::PacketReceived).
    fn send(&mut self, channel: AdvertisingChannel, access_address: u32, crc_init: u32, pdu: &[u8], rx_after_tx: bool);

    /// Aborts any in-flight transmission or reception.
    fn stop(&mut self);

    /// Answers the packet being handled with `pdu`, T_IFS after it ended.
    /// Only meaningful while handling a received packet.
    fn reply(&mut self, pdu: &[u8]);
}

/// Timer facility, millisecond resolution.
///
/// Expiries come back as [`Event::EventTimerFired`](crate::Event::EventTimerFired) and
/// [`Event::IntervalTimerFired`](crate::Event::IntervalTimerFired).
pub trait Timers {
    /// (Re)arms the repeating advertising event timer.
    fn start_event(&mut self, period_ms: u32);

    /// (Re)arms the one-shot inter-channel timer. It does not rearm itself once fired.
    fn start_interval(&mut self, delay_ms: u32);
}
