// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::vec::Vec;

use super::*;

mod pdu;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RadioCall {
    Send {
        channel: u8,
        access_address: u32,
        crc_init: u32,
        pdu: Vec<u8>,
        rx_after_tx: bool,
    },
    Stop,
    Reply(Vec<u8>),
}

#[derive(Default)]
struct Radio {
    calls: Vec<RadioCall>,
}

impl Radio {
    /// Channel indices sent on, in order.
    fn sent_channels(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RadioCall::Send { channel, .. } => Some(*channel),
                _ => None,
            })
            .collect()
    }

    fn replies(&self) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RadioCall::Reply(pdu) => Some(pdu.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl crate::Radio for Radio {
    fn send(&mut self, channel: AdvertisingChannel, access_address: u32, crc_init: u32, pdu: &[u8], rx_after_tx: bool) {
        self.calls.push(RadioCall::Send {
            channel: channel.index(),
            access_address,
            crc_init,
            pdu: pdu.to_vec(),
            rx_after_tx,
        });
    }

    fn stop(&mut self) {
        self.calls.push(RadioCall::Stop);
    }

    fn reply(&mut self, pdu: &[u8]) {
        self.calls.push(RadioCall::Reply(pdu.to_vec()));
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TimerCall {
    Event(u32),
    Interval(u32),
}

#[derive(Default)]
struct Timers {
    calls: Vec<TimerCall>,
}

impl Timers {
    fn interval_arms(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, TimerCall::Interval(_)))
            .count()
    }
}

impl crate::Timers for Timers {
    fn start_event(&mut self, period_ms: u32) {
        self.calls.push(TimerCall::Event(period_ms));
    }

    fn start_interval(&mut self, delay_ms: u32) {
        self.calls.push(TimerCall::Interval(delay_ms));
    }
}

fn broadcaster_with(config: Config) -> Broadcaster<Radio, Timers> {
    Broadcaster::new(Radio::default(), Timers::default(), config).unwrap()
}

fn broadcaster() -> Broadcaster<Radio, Timers> {
    broadcaster_with(Config::default())
}

/// ADV_SCAN_IND: header, AdvA, <<Shortened Local Name>> "blessed".
const ADV_SCAN_IND: [u8; 17] = [
    0x46, 0x0F, // Header
    0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, // AdvA
    0x08, // AD Length
    0x08, // AD Type
    0x62, 0x6c, 0x65, 0x73, 0x73, 0x65, 0x64, // AD Data
];

/// SCAN_RSP: header, AdvA, <<Complete Local Name>> "blessed device".
const SCAN_RSP: [u8; 24] = [
    0x44, 0x16, // Header
    0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, // AdvA
    0x0F, // AD Length
    0x09, // AD Type
    0x62, 0x6c, 0x65, 0x73, 0x73, 0x65, 0x64, 0x20, // AD Data
    0x64, 0x65, 0x76, 0x69, 0x63, 0x65,
];

/// SCAN_REQ from ScanA 11:22:33:44:55:66 to our AdvA.
const SCAN_REQ: [u8; 14] = [
    0x83, 0x0C, // Header
    0x66, 0x55, 0x44, 0x33, 0x22, 0x11, // ScanA
    0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, // AdvA
];

#[test]
fn invalid_timing_is_rejected() {
    let config = Config {
        event_interval_ms: 30,
        channel_interval_ms: 10,
        ..Default::default()
    };
    let res = Broadcaster::new(Radio::default(), Timers::default(), config);
    assert_eq!(res.err(), Some(Error::InvalidTiming));
}

#[test]
fn nothing_happens_before_start() {
    let b = broadcaster();

    assert_eq!(b.scheduler().state(), State::Idle);
    assert!(b.radio().calls.is_empty());
    assert!(b.timers().calls.is_empty());
}

#[test]
fn scan_request_mid_event_keeps_the_channel_cycle() {
    let mut b = broadcaster();
    b.start();
    b.dispatch(Event::IntervalTimerFired);
    b.dispatch(Event::PacketReceived {
        pdu: &SCAN_REQ,
        crc_valid: true,
    });
    b.dispatch(Event::IntervalTimerFired);

    assert_eq!(b.radio().sent_channels(), [37, 38, 39]);
    assert_eq!(b.radio().replies(), [&SCAN_RSP[..]]);
    assert_eq!(b.scheduler().state(), State::EventDone);
}
