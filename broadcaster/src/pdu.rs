// SPDX-FileCopyrightText: 2024 Foundation Devices, Inc. <hello@foundation.xyz>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Advertising channel PDUs.
//!
//! Link Layer specification section 2.3, Core 4.1:
//!
//! ```text
//! +--------+--------+-----------+
//! | Header |  AdvA  |  AdvData  |
//! +--------+--------+-----------+
//!  2 octets 6 octets 0-31 octets
//! ```
//!
//! The first header octet carries the PDU type in its low nibble and the TxAdd / RxAdd address
//! type bits in its two high bits. The second octet is the payload length (AdvA + AdvData).

use bitflags::bitflags;
use consts::{DEVICE_ADDRESS, DEVICE_NAME, MAX_ADV_PDU_SIZE, MAX_AD_DATA_SIZE, SHORT_NAME};
use heapless::Vec;

use crate::Error;

/// Encoded advertising channel PDU, header included.
pub type PduBuf = Vec<u8, MAX_ADV_PDU_SIZE>;

/// Advertising channel PDU types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PduType {
    AdvInd = 0b0000,
    AdvDirectInd = 0b0001,
    AdvNonconnInd = 0b0010,
    ScanReq = 0b0011,
    ScanRsp = 0b0100,
    ConnectReq = 0b0101,
    AdvScanInd = 0b0110,
}

impl PduType {
    /// Decodes the PDU type from the low nibble of the first header octet.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0F {
            0b0000 => Some(Self::AdvInd),
            0b0001 => Some(Self::AdvDirectInd),
            0b0010 => Some(Self::AdvNonconnInd),
            0b0011 => Some(Self::ScanReq),
            0b0100 => Some(Self::ScanRsp),
            0b0101 => Some(Self::ConnectReq),
            0b0110 => Some(Self::AdvScanInd),
            _ => None,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }
}

bitflags! {
    /// Address type bits of the first header octet.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct HeaderFlags: u8 {
        /// The sender's address (AdvA / ScanA) is random.
        const TX_ADD = 0x40;
        /// The receiver's address (AdvA of a SCAN_REQ) is random.
        const RX_ADD = 0x80;
    }
}

/// 2 octet advertising channel PDU header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub pdu_type: PduType,
    pub flags: HeaderFlags,
    pub length: u8,
}

impl Header {
    pub const SIZE: usize = 2;

    pub const fn new(pdu_type: PduType, flags: HeaderFlags, length: u8) -> Self {
        Self { pdu_type, flags, length }
    }

    /// First header octet: PDU type and address type bits.
    pub const fn first_octet(&self) -> u8 {
        self.pdu_type.bits() | self.flags.bits()
    }

    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        [self.first_octet(), self.length]
    }

    /// Decodes the header at the start of `bytes`. Bits of the first octet outside of the PDU type
    /// and address type fields are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let &[first, length, ..] = bytes else {
            return Err(Error::Truncated);
        };
        let pdu_type = PduType::from_bits(first).ok_or(Error::UnknownPduType(first & 0x0F))?;
        Ok(Self {
            pdu_type,
            flags: HeaderFlags::from_bits_truncate(first),
            length,
        })
    }
}

/// Receive buffer size covering any value of the length octet, so the radio can never write past
/// the buffer whatever it picks up.
pub const RX_BUF_SIZE: usize = Header::SIZE + u8::MAX as usize;

/// Length of the advertising channel PDU at the start of a receive buffer, header included.
/// `None` when the buffer is shorter than the header or the length octet exceeds the 37 octet
/// advertising channel payload.
pub fn received_len(buf: &[u8]) -> Option<usize> {
    let &[_, length, ..] = buf else {
        return None;
    };
    let len = Header::SIZE + length as usize;
    (len <= MAX_ADV_PDU_SIZE && len <= buf.len()).then_some(len)
}

/// Bluetooth device address, stored in over-the-air (little endian) byte order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(pub [u8; 6]);

impl DeviceAddress {
    pub const SIZE: usize = 6;

    pub const fn bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

/// AD structure carried in AdvData / ScanRspData.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdStructure<'a> {
    /// <<Flags>>
    Flags(u8),
    /// <<Shortened Local Name>>
    ShortenedLocalName(&'a str),
    /// <<Complete Local Name>>
    CompleteLocalName(&'a str),
}

impl AdStructure<'_> {
    /// Assigned number of the AD type.
    pub const fn ad_type(&self) -> u8 {
        match self {
            AdStructure::Flags(_) => 0x01,
            AdStructure::ShortenedLocalName(_) => 0x08,
            AdStructure::CompleteLocalName(_) => 0x09,
        }
    }

    fn data(&self) -> &[u8] {
        match self {
            AdStructure::Flags(flags) => core::slice::from_ref(flags),
            AdStructure::ShortenedLocalName(name) | AdStructure::CompleteLocalName(name) => name.as_bytes(),
        }
    }

    /// Octets taken by the structure once encoded: length, type and data.
    pub fn encoded_len(&self) -> usize {
        2 + self.data().len()
    }

    fn encode_into<const N: usize>(&self, buf: &mut Vec<u8, N>) -> Result<(), Error> {
        let data = self.data();
        // The length octet counts the type octet and the data.
        buf.push(data.len() as u8 + 1).map_err(|_| Error::PayloadTooLarge)?;
        buf.push(self.ad_type()).map_err(|_| Error::PayloadTooLarge)?;
        buf.extend_from_slice(data).map_err(|_| Error::PayloadTooLarge)
    }
}

/// Advertising channel PDU sent by the advertiser: header, AdvA and AD structures.
#[derive(Copy, Clone, Debug)]
pub struct AdvertisingPdu<'a> {
    pub pdu_type: PduType,
    pub flags: HeaderFlags,
    pub address: DeviceAddress,
    pub data: &'a [AdStructure<'a>],
}

impl AdvertisingPdu<'_> {
    /// Serializes the PDU, computing the header length field.
    pub fn encode(&self) -> Result<PduBuf, Error> {
        let data_len: usize = self.data.iter().map(AdStructure::encoded_len).sum();
        if data_len > MAX_AD_DATA_SIZE {
            return Err(Error::PayloadTooLarge);
        }
        let header = Header::new(self.pdu_type, self.flags, (DeviceAddress::SIZE + data_len) as u8);

        let mut buf = PduBuf::new();
        buf.extend_from_slice(&header.to_bytes()).map_err(|_| Error::PayloadTooLarge)?;
        buf.extend_from_slice(self.address.bytes()).map_err(|_| Error::PayloadTooLarge)?;
        for ad in self.data {
            ad.encode_into(&mut buf)?;
        }
        Ok(buf)
    }
}

/// The two fixed PDUs of the broadcaster, encoded once at start-up.
#[derive(Clone, Debug)]
pub struct Pdus {
    advertisement: PduBuf,
    scan_response: PduBuf,
}

impl Pdus {
    pub fn new() -> Result<Self, Error> {
        let address = DeviceAddress(DEVICE_ADDRESS);

        // Header: PDU Type=ADV_SCAN_IND, TxAdd=1, Length=15
        let advertisement = AdvertisingPdu {
            pdu_type: PduType::AdvScanInd,
            flags: HeaderFlags::TX_ADD,
            address,
            data: &[AdStructure::ShortenedLocalName(SHORT_NAME)],
        }
        .encode()?;

        // Header: PDU Type=SCAN_RSP, TxAdd=1, Length=22
        let scan_response = AdvertisingPdu {
            pdu_type: PduType::ScanRsp,
            flags: HeaderFlags::TX_ADD,
            address,
            data: &[AdStructure::CompleteLocalName(DEVICE_NAME)],
        }
        .encode()?;

        Ok(Self {
            advertisement,
            scan_response,
        })
    }

    /// ADV_SCAN_IND sent on every advertising channel.
    pub fn advertisement(&self) -> &[u8] {
        &self.advertisement
    }

    /// SCAN_RSP returned to scan requests.
    pub fn scan_response(&self) -> &[u8] {
        &self.scan_response
    }
}
