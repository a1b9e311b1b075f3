// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scannable, non-connectable BLE broadcaster.
//!
//! The device sends an ADV_SCAN_IND on the three primary advertising channels at every
//! advertising event and answers SCAN_REQs with a SCAN_RSP. Timers and radio are reached through
//! the [`hal`] traits; their notifications are fed back as [`Event`]s to
//! [`Broadcaster::dispatch`], one at a time, from a single event loop.

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod channel;
pub mod config;
pub mod hal;
pub mod pdu;
pub mod responder;
pub mod scheduler;

#[cfg(test)]
mod tests;

use core::fmt::{Display, Formatter};

pub use channel::{AdvertisingChannel, ChannelSet};
pub use config::{Config, CrcPolicy};
pub use hal::{Radio, Timers};
pub use pdu::Pdus;
pub use responder::ScanResponder;
pub use scheduler::{Scheduler, State};

/// Errors raised while setting the broadcaster up. Nothing fails once it runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// AD structures do not fit in the 31 octet AdvData / ScanRspData field
    PayloadTooLarge,
    /// Fewer than the 2 header octets
    Truncated,
    /// PDU type field value reserved for future use
    UnknownPduType(u8),
    /// Event period not longer than a full pass over the advertising channels
    InvalidTiming,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::PayloadTooLarge => write!(f, "advertising data larger than 31 octets"),
            Error::Truncated => write!(f, "PDU shorter than its header"),
            Error::UnknownPduType(bits) => write!(f, "unknown PDU type {:#06b}", bits),
            Error::InvalidTiming => write!(f, "advertising event interval too short for the channel interval"),
        }
    }
}

/// Notifications from the timer facility and the radio.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event<'a> {
    /// The repeating advertising event timer expired.
    EventTimerFired,
    /// The one-shot inter-channel timer expired.
    IntervalTimerFired,
    /// The radio received a packet. `pdu` is only borrowed for the dispatch.
    PacketReceived { pdu: &'a [u8], crc_valid: bool },
}

/// Scheduler and scan responder bound to their radio and timers.
pub struct Broadcaster<R, T> {
    radio: R,
    timers: T,
    pdus: Pdus,
    scheduler: Scheduler,
    responder: ScanResponder,
}

impl<R: Radio, T: Timers> Broadcaster<R, T> {
    pub fn new(radio: R, timers: T, config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            radio,
            timers,
            pdus: Pdus::new()?,
            scheduler: Scheduler::new(&config),
            responder: ScanResponder::new(config.crc_policy),
        })
    }

    /// Arms the event timer and sends the first advertisement on channel 37 before returning.
    pub fn start(&mut self) {
        info!("broadcaster started");
        self.scheduler
            .start(&mut self.radio, &mut self.timers, self.pdus.advertisement());
    }

    /// Runs the state transition for `event` to completion.
    pub fn dispatch(&mut self, event: Event<'_>) {
        match event {
            Event::EventTimerFired => {
                self.scheduler
                    .on_event_timer(&mut self.radio, &mut self.timers, self.pdus.advertisement())
            }
            Event::IntervalTimerFired => {
                self.scheduler
                    .on_interval_timer(&mut self.radio, &mut self.timers, self.pdus.advertisement())
            }
            Event::PacketReceived { pdu, crc_valid } => {
                self.responder
                    .on_packet(&mut self.radio, pdu, crc_valid, self.pdus.scan_response());
            }
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn responder(&self) -> &ScanResponder {
        &self.responder
    }

    pub fn pdus(&self) -> &Pdus {
        &self.pdus
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}
