// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! RADIO peripheral in BLE 1 Mbit mode.
//!
//! The broadcaster only records what it wants the radio to do; the advertising task carries it
//! out with [`NrfRadio::execute`] once the dispatch returned, and listens with
//! [`NrfRadio::receive`] until the next timer expires.

use broadcaster::pdu::{received_len, PduBuf, RX_BUF_SIZE};
use broadcaster::AdvertisingChannel;
use defmt::{trace, warn};
use embassy_nrf::peripherals::RADIO;
use embassy_nrf::radio::ble::{Mode, Radio};
use embassy_nrf::radio::{InterruptHandler, TxPower};
use embassy_nrf::{bind_interrupts, pac, Peripheral};

bind_interrupts!(pub struct Irqs {
    RADIO => InterruptHandler<RADIO>;
});

/// CRC-24 polynomial x^24 + x^10 + x^9 + x^6 + x^4 + x^3 + x + 1.
const BLE_CRC_POLY: u32 = 0x0000_065B;

enum Command {
    Send {
        channel: AdvertisingChannel,
        access_address: u32,
        crc_init: u32,
        pdu: PduBuf,
        rx_after_tx: bool,
    },
    Reply {
        pdu: PduBuf,
    },
}

/// A packet sitting in the receive buffer.
pub struct Received {
    pub len: usize,
    pub crc_valid: bool,
}

pub struct NrfRadio<'d> {
    radio: Radio<'d, RADIO>,
    command: Option<Command>,
    listening: bool,
}

impl<'d> NrfRadio<'d> {
    pub fn new(radio: impl Peripheral<P = RADIO> + 'd) -> Self {
        let mut radio = Radio::new(radio, Irqs);
        radio.set_mode(Mode::BLE_1MBIT);
        radio.set_tx_power(TxPower::_0D_BM);
        radio.set_header_expansion(false);
        radio.set_crc_poly(BLE_CRC_POLY);

        Self {
            radio,
            command: None,
            listening: false,
        }
    }

    fn tune(&mut self, channel: AdvertisingChannel, access_address: u32, crc_init: u32) {
        self.radio.set_frequency(channel.freq_mhz().into());
        self.radio.set_whitening_init(channel.whitening_iv());
        self.radio.set_access_address(access_address);
        self.radio.set_crc_init(crc_init);
    }

    /// Transmits whatever the last dispatch asked for.
    pub async fn execute(&mut self) {
        match self.command.take() {
            Some(Command::Send {
                channel,
                access_address,
                crc_init,
                pdu,
                rx_after_tx,
            }) => {
                self.tune(channel, access_address, crc_init);
                if let Err(e) = self.radio.transmit(&pdu).await {
                    warn!("adv tx on channel {} failed: {:?}", channel.index(), e);
                }
                self.listening = rx_after_tx;
            }
            Some(Command::Reply { pdu }) => {
                // Still tuned to the channel the request came in on.
                if let Err(e) = self.radio.transmit(&pdu).await {
                    warn!("scan response tx failed: {:?}", e);
                }
                self.listening = false;
            }
            None => {}
        }
    }

    /// Waits for a packet on the channel of the last advertisement. Never completes when the radio
    /// is not listening, so that only the timers wake the advertising task up.
    ///
    /// The driver lets the radio write up to 255 payload octets, hence the buffer size. Packets
    /// longer than an advertising channel PDU are dropped.
    pub async fn receive(&mut self, buf: &mut [u8; RX_BUF_SIZE]) -> Option<Received> {
        if !self.listening {
            return core::future::pending().await;
        }

        if let Err(e) = self.radio.receive(buf).await {
            warn!("rx failed: {:?}", e);
            return None;
        }

        // SAFETY: read-only access to a status register of the peripheral we own.
        let crc_valid = unsafe { &*pac::RADIO::ptr() }.crcstatus.read().crcstatus().is_crcok();
        let Some(len) = received_len(buf) else {
            trace!("rx dropped, length octet {}", buf[1]);
            return None;
        };
        trace!("rx {} bytes, crc ok: {}", len, crc_valid);
        Some(Received { len, crc_valid })
    }
}

impl broadcaster::Radio for NrfRadio<'_> {
    fn send(&mut self, channel: AdvertisingChannel, access_address: u32, crc_init: u32, pdu: &[u8], rx_after_tx: bool) {
        let Ok(pdu) = PduBuf::from_slice(pdu) else {
            warn!("adv PDU too long: {} bytes", pdu.len());
            return;
        };
        self.command = Some(Command::Send {
            channel,
            access_address,
            crc_init,
            pdu,
            rx_after_tx,
        });
    }

    fn stop(&mut self) {
        self.command = None;
        self.listening = false;
    }

    fn reply(&mut self, pdu: &[u8]) {
        let Ok(pdu) = PduBuf::from_slice(pdu) else {
            warn!("scan response too long: {} bytes", pdu.len());
            return;
        };
        self.command = Some(Command::Reply { pdu });
    }
}
