// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use consts::SCAN_REQ_HEADER;

use crate::config::CrcPolicy;
use crate::hal::Radio;

/// Answers scan requests with the scan response PDU.
pub struct ScanResponder {
    crc_policy: CrcPolicy,
    answered: u32,
}

impl ScanResponder {
    pub fn new(crc_policy: CrcPolicy) -> Self {
        Self { crc_policy, answered: 0 }
    }

    /// Handles a packet received after an advertisement. Only the first header octet is looked at:
    /// anything but a SCAN_REQ is dropped without a trace.
    ///
    /// Returns whether a reply was issued.
    pub fn on_packet<R: Radio>(&mut self, radio: &mut R, pdu: &[u8], crc_valid: bool, scan_response: &[u8]) -> bool {
        if !is_scan_request(pdu) {
            return false;
        }
        if self.crc_policy == CrcPolicy::RequireValid && !crc_valid {
            return false;
        }

        radio.reply(scan_response);
        self.answered = self.answered.wrapping_add(1);
        debug!("scan response sent (crc ok: {})", crc_valid);
        true
    }

    pub fn crc_policy(&self) -> CrcPolicy {
        self.crc_policy
    }

    /// Number of scan requests answered so far.
    pub fn answered(&self) -> u32 {
        self.answered
    }
}

/// True when the first header octet is the one of a SCAN_REQ aimed at a random device address.
pub fn is_scan_request(pdu: &[u8]) -> bool {
    pdu.first() == Some(&SCAN_REQ_HEADER)
}
