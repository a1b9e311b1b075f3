// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::pdu::{received_len, AdStructure, AdvertisingPdu, DeviceAddress, Header, HeaderFlags, PduType, RX_BUF_SIZE};

#[test]
fn advertisement_layout() {
    let pdus = Pdus::new().unwrap();
    assert_eq!(pdus.advertisement(), ADV_SCAN_IND);

    let header = Header::parse(pdus.advertisement()).unwrap();
    assert_eq!(header.pdu_type, PduType::AdvScanInd);
    assert_eq!(header.flags, HeaderFlags::TX_ADD);
    assert_eq!(header.length as usize, ADV_SCAN_IND.len() - Header::SIZE);
}

#[test]
fn scan_response_header() {
    let pdus = Pdus::new().unwrap();
    let header = Header::parse(pdus.scan_response()).unwrap();

    assert_eq!(header, Header::new(PduType::ScanRsp, HeaderFlags::TX_ADD, 22));
    assert_eq!(header.to_bytes(), [0x44, 0x16]);
}

#[test]
fn header_parse_errors() {
    assert_eq!(Header::parse(&[]), Err(Error::Truncated));
    assert_eq!(Header::parse(&[0x46]), Err(Error::Truncated));
    assert_eq!(Header::parse(&[0x07, 0x00]), Err(Error::UnknownPduType(0x07)));
    assert_eq!(Header::parse(&[0xCF, 0x00]), Err(Error::UnknownPduType(0x0F)));
}

#[test]
fn header_ignores_reserved_bits() {
    // Bits 4 and 5 of the first octet are reserved.
    let header = Header::parse(&[0x33, 0x0C]).unwrap();
    assert_eq!(header.pdu_type, PduType::ScanReq);
    assert!(header.flags.is_empty());
}

#[test]
fn pdu_type_bits() {
    for bits in 0..=6 {
        assert_eq!(PduType::from_bits(bits).map(PduType::bits), Some(bits));
    }
    assert_eq!(PduType::from_bits(0x46), Some(PduType::AdvScanInd));
    assert_eq!(PduType::from_bits(0x08), None);
}

#[test]
fn ad_structures() {
    let pdu = AdvertisingPdu {
        pdu_type: PduType::AdvNonconnInd,
        flags: HeaderFlags::empty(),
        address: DeviceAddress([1, 2, 3, 4, 5, 6]),
        data: &[AdStructure::Flags(0x06), AdStructure::ShortenedLocalName("ab")],
    }
    .encode()
    .unwrap();

    assert_eq!(
        pdu.as_slice(),
        [0x02, 13, 1, 2, 3, 4, 5, 6, 0x02, 0x01, 0x06, 0x03, 0x08, b'a', b'b']
    );
}

#[test]
fn advertising_data_limit() {
    // 2 + 29 = 31 octets: the largest AdvData allowed.
    let name = "abcdefghijklmnopqrstuvwxyzabc";
    let fits = AdvertisingPdu {
        pdu_type: PduType::AdvScanInd,
        flags: HeaderFlags::TX_ADD,
        address: DeviceAddress(consts::DEVICE_ADDRESS),
        data: &[AdStructure::CompleteLocalName(name)],
    }
    .encode()
    .unwrap();
    assert_eq!(fits.len(), consts::MAX_ADV_PDU_SIZE);

    let too_long = AdvertisingPdu {
        pdu_type: PduType::AdvScanInd,
        flags: HeaderFlags::TX_ADD,
        address: DeviceAddress(consts::DEVICE_ADDRESS),
        data: &[AdStructure::CompleteLocalName("abcdefghijklmnopqrstuvwxyzabcd")],
    }
    .encode();
    assert_eq!(too_long, Err(Error::PayloadTooLarge));
}

#[test]
fn received_frame_length() {
    let mut buf = [0u8; RX_BUF_SIZE];
    assert_eq!(RX_BUF_SIZE, 257);

    buf[..SCAN_REQ.len()].copy_from_slice(&SCAN_REQ);
    assert_eq!(received_len(&buf), Some(SCAN_REQ.len()));

    // Largest advertising channel payload.
    buf[1] = 37;
    assert_eq!(received_len(&buf), Some(39));

    // Noise or data channel sized frames still land inside the buffer, but are dropped.
    buf[1] = 38;
    assert_eq!(received_len(&buf), None);
    buf[1] = 0xFF;
    assert_eq!(received_len(&buf), None);

    assert_eq!(received_len(&[0x83]), None);
    assert_eq!(received_len(&[0x83, 0x0C, 0x66]), None);
}
