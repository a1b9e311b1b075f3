// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Advertising event scheduler.
//!
//! Two timers drive the advertising: the repeating event timer starts an advertising event every
//! `event_interval_ms`, and the one-shot interval timer steps through the advertising channels
//! `channel_interval_ms` apart inside the event. An advertising event sends the advertisement
//! once on each channel of the [`ChannelSet`], in order.

use consts::{ADV_CHANNEL_AA, ADV_CHANNEL_CRC};

use crate::channel::{AdvertisingChannel, ChannelSet};
use crate::config::Config;
use crate::hal::{Radio, Timers};

/// Position of the scheduler in the advertising event cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// [`Scheduler::start`] has not been called yet.
    Idle,
    EventChannel0,
    EventChannel1,
    /// Transient: the event completes as soon as the send on the last channel is issued.
    EventChannel2,
    /// Every channel of the current event has been sent on, waiting for the next event.
    EventDone,
}

pub struct Scheduler {
    channels: ChannelSet,
    /// Channel of the current event, `ChannelSet::LEN` once the event is complete.
    cursor: usize,
    started: bool,
    event_interval_ms: u32,
    channel_interval_ms: u32,
    events: u32,
}

impl Scheduler {
    pub fn new(config: &Config) -> Self {
        Self {
            channels: ChannelSet::primary(),
            cursor: 0,
            started: false,
            event_interval_ms: config.event_interval_ms,
            channel_interval_ms: config.channel_interval_ms,
            events: 0,
        }
    }

    /// Arms the event timer and runs the first advertising event right away, so the device is
    /// discoverable without waiting for a whole event period.
    pub fn start<R: Radio, T: Timers>(&mut self, radio: &mut R, timers: &mut T, pdu: &[u8]) {
        timers.start_event(self.event_interval_ms);
        self.on_event_timer(radio, timers, pdu);
    }

    /// Starts a new advertising event from the first channel, whatever the current one was doing.
    pub fn on_event_timer<R: Radio, T: Timers>(&mut self, radio: &mut R, timers: &mut T, pdu: &[u8]) {
        self.started = true;
        self.cursor = 0;
        self.events = self.events.wrapping_add(1);
        debug!("advertising event {}", self.events);
        self.advertise(radio, timers, pdu);
    }

    /// Moves on to the next channel of the event. A late fire after the event completed is dropped.
    pub fn on_interval_timer<R: Radio, T: Timers>(&mut self, radio: &mut R, timers: &mut T, pdu: &[u8]) {
        if !self.started || self.cursor >= ChannelSet::LEN {
            return;
        }
        self.cursor += 1;
        self.advertise(radio, timers, pdu);
    }

    fn advertise<R: Radio, T: Timers>(&mut self, radio: &mut R, timers: &mut T, pdu: &[u8]) {
        let Some(channel) = self.channels.get(self.cursor) else {
            self.cursor = ChannelSet::LEN;
            return;
        };

        radio.stop();
        radio.send(channel, ADV_CHANNEL_AA, ADV_CHANNEL_CRC, pdu, true);
        trace!("adv sent on channel {}", channel.index());

        if self.cursor + 1 < ChannelSet::LEN {
            timers.start_interval(self.channel_interval_ms);
        } else {
            // Last channel: nothing left to arm until the next event.
            self.cursor = ChannelSet::LEN;
        }
    }

    pub fn state(&self) -> State {
        match (self.started, self.cursor) {
            (false, _) => State::Idle,
            (true, 0) => State::EventChannel0,
            (true, 1) => State::EventChannel1,
            (true, 2) => State::EventChannel2,
            (true, _) => State::EventDone,
        }
    }

    /// Channel of the event in progress, `None` when idle or once the event is complete.
    pub fn current_channel(&self) -> Option<AdvertisingChannel> {
        self.started.then(|| self.channels.get(self.cursor)).flatten()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn channel_set(&self) -> &ChannelSet {
        &self.channels
    }

    /// Number of advertising events started so far.
    pub fn events(&self) -> u32 {
        self.events
    }
}
