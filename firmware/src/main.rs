// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

#![no_std]
#![no_main]

mod radio;
mod timers;

use core::pin::pin;
#[cfg(feature = "debug")]
use defmt_rtt as _;
// global logger
use embassy_nrf as _;
// time driver
use panic_probe as _;

use broadcaster::pdu::RX_BUF_SIZE;
use broadcaster::{Broadcaster, Config, CrcPolicy, Event};
use defmt::{info, *};
use embassy_executor::Spawner;
use embassy_nrf::interrupt;
use embassy_time::Timer;
use futures::future::{select, Either};
use radio::{NrfRadio, Received};
use timers::Deadlines;

#[cfg(not(feature = "debug"))]
mod dummy_logging {
    #[defmt::global_logger]
    struct Logger;

    unsafe impl defmt::Logger for Logger {
        fn acquire() {}

        unsafe fn flush() {}

        unsafe fn release() {}

        unsafe fn write(_bytes: &[u8]) {}
    }
}

type NrfBroadcaster = Broadcaster<NrfRadio<'static>, Deadlines>;

/// What woke the advertising task up.
enum Wake {
    EventTimer,
    IntervalTimer,
    Packet(Received),
    Nothing,
}

async fn next_wake(broadcaster: &mut NrfBroadcaster, rx_buf: &mut [u8; RX_BUF_SIZE]) -> Wake {
    let event_timer = Timer::at(broadcaster.timers().next_event());
    let interval_timer = Timer::at(broadcaster.timers().next_interval());
    let rx = pin!(broadcaster.radio_mut().receive(rx_buf));

    // Dropping the receive future when a timer wins aborts the reception.
    match select(select(event_timer, interval_timer), rx).await {
        Either::Left((Either::Left(_), _)) => Wake::EventTimer,
        Either::Left((Either::Right(_), _)) => Wake::IntervalTimer,
        Either::Right((Some(received), _)) => Wake::Packet(received),
        Either::Right((None, _)) => Wake::Nothing,
    }
}

#[embassy_executor::task]
async fn advertising_task(mut broadcaster: NrfBroadcaster) -> ! {
    let mut rx_buf = [0u8; RX_BUF_SIZE];

    broadcaster.start();

    loop {
        // Radio work requested by the last dispatch.
        broadcaster.radio_mut().execute().await;

        match next_wake(&mut broadcaster, &mut rx_buf).await {
            Wake::EventTimer => {
                broadcaster.timers_mut().event_fired();
                broadcaster.dispatch(Event::EventTimerFired);
            }
            Wake::IntervalTimer => {
                broadcaster.timers_mut().interval_fired();
                broadcaster.dispatch(Event::IntervalTimerFired);
            }
            Wake::Packet(Received { len, crc_valid }) => {
                broadcaster.dispatch(Event::PacketReceived {
                    pdu: &rx_buf[..len],
                    crc_valid,
                });
            }
            Wake::Nothing => {}
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut conf = embassy_nrf::config::Config::default();
    // The radio needs the HF crystal running
    conf.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    conf.lfclk_source = embassy_nrf::config::LfclkSource::ExternalXtal;
    conf.time_interrupt_priority = interrupt::Priority::P2;

    let p = embassy_nrf::init(conf);

    let config = Config {
        crc_policy: if cfg!(feature = "crc-gated-reply") {
            CrcPolicy::RequireValid
        } else {
            CrcPolicy::Ignore
        },
        ..Default::default()
    };
    info!(
        "Advertising every {} ms, {} ms between channels",
        config.event_interval_ms, config.channel_interval_ms
    );

    let broadcaster = unwrap!(
        Broadcaster::new(NrfRadio::new(p.RADIO), Deadlines::new(), config),
        "Setting up the broadcaster failed"
    );
    unwrap!(spawner.spawn(advertising_task(broadcaster)), "Spawning the advertising task failed");
}
