// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

#![no_std]

/// Access Address shared by every advertising channel packet.
/// Link Layer specification section 2.1.2, Core 4.1.
pub const ADV_CHANNEL_AA: u32 = 0x8E89_BED6;

/// CRC initialization value for advertising channel packets.
/// Link Layer specification section 3.1.1, Core 4.1. Only the lower 24 bits are used.
pub const ADV_CHANNEL_CRC: u32 = 0x55_5555;

/// Primary advertising channel indices, in per-event transmission order.
pub const ADV_CHANNELS: [u8; 3] = [37, 38, 39];

/// Period between two advertising events.
/// 1280 ms is a multiple of the 0.625 ms Advertising_Interval unit (2048 units).
pub const ADV_EVENT_INTERVAL_MS: u32 = 1280;

/// Spacing between two channel sends inside one advertising event.
pub const ADV_CHANNEL_INTERVAL_MS: u32 = 10;

/// Advertiser address, in over-the-air byte order (FF:EE:DD:CC:BB:AA once printed MSB first).
pub const DEVICE_ADDRESS: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];

/// Short device name carried by the ADV_SCAN_IND advertising data.
pub const SHORT_NAME: &str = "blessed";

/// Full device name carried by the SCAN_RSP data.
/// Only handed out on scan request since the advertisement keeps the short name.
pub const DEVICE_NAME: &str = "blessed device";

/// First header octet of a SCAN_REQ addressed to a random advertiser address
/// (PDU type 0b0011 with the RxAdd bit set).
pub const SCAN_REQ_HEADER: u8 = 0x83;

/// Largest advertising channel PDU: 2 header octets + 37 payload octets.
pub const MAX_ADV_PDU_SIZE: usize = 39;

/// Largest AdvData / ScanRspData field.
pub const MAX_AD_DATA_SIZE: usize = 31;
