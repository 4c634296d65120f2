//! Decoding of advertising data into a field set
//!
//! [`AdvFields::decode`] walks the input one AD structure at a time until the input is used up.
//! The input comes from a peer over the air, so nothing about it can be trusted: every length is
//! checked against the bytes that actually remain before anything is read.

use crate::assigned::{self, AdType};
use crate::fields::{AdvFields, LocalName, ServiceUuids128, ServiceUuids16, ServiceUuids32, TxPowerLevel};
use crate::{DecodeError, HEADER_SIZE, MAX_FIELD_LEN};
use alloc::vec::Vec;

/// Parse the data of a 16-bit UUID list out of its little endian wire form
fn parse_uuids16(ad_type: AdType, data: &[u8]) -> Result<Vec<u16>, DecodeError> {
    if data.len() % 2 != 0 {
        return Err(DecodeError::BadLength {
            ad_type: ad_type.val(),
            len: data.len(),
        });
    }

    Ok(data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect())
}

/// Parse the data of a 32-bit UUID list out of its little endian wire form
fn parse_uuids32(ad_type: AdType, data: &[u8]) -> Result<Vec<u32>, DecodeError> {
    if data.len() % 4 != 0 {
        return Err(DecodeError::BadLength {
            ad_type: ad_type.val(),
            len: data.len(),
        });
    }

    Ok(data
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// A view of one AD structure within the input
struct AdStructRef<'a> {
    ad_type: u8,
    data: &'a [u8],
}

impl<'a> AdStructRef<'a> {
    /// Split one AD structure off the front of `bytes`
    ///
    /// The structure's size on the wire is its length byte plus one, where the length byte counts
    /// the type byte and the data. The split fails if the structure claims more bytes than
    /// `bytes` holds.
    fn take_from(bytes: &'a [u8]) -> Result<(Self, &'a [u8]), DecodeError> {
        let length_byte = *bytes.first().ok_or(DecodeError::Truncated {
            required: 1,
            remaining: 0,
        })? as usize;

        if length_byte == 0 {
            return Err(DecodeError::ZeroLength);
        }

        let size = length_byte + 1;

        if bytes.len() < size {
            return Err(DecodeError::Truncated {
                required: size,
                remaining: bytes.len(),
            });
        }

        let data = &bytes[HEADER_SIZE..size];

        // This cap exists so a single structure cannot claim an absurd amount of a large buffer,
        // and it bounds the allocation made for a converted UUID list.
        if data.len() > MAX_FIELD_LEN {
            return Err(DecodeError::FieldTooLarge { len: data.len() });
        }

        let st = AdStructRef {
            ad_type: bytes[1],
            data,
        };

        Ok((st, &bytes[size..]))
    }
}

impl<'a> AdvFields<'a> {
    /// Decode advertising data into a field set
    ///
    /// Every recognized AD structure within `data` populates its field of the returned set.
    /// Structures with an unrecognized AD type are skipped; a peer using AD types from a newer
    /// assigned numbers document does not fail the decode.
    ///
    /// ```
    /// # use ble_adv_fields::AdvFields;
    /// let fields = AdvFields::decode(&[0x2, 0x1, 0x6]).unwrap();
    ///
    /// assert_eq!(fields.flags, Some(0x6));
    /// ```
    ///
    /// # Errors
    /// The decode ends at the first structure that is truncated or whose data does not match the
    /// format of its AD type.
    pub fn decode(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut fields = AdvFields::default();

        let mut remaining = data;

        while !remaining.is_empty() {
            let (st, rest) = AdStructRef::take_from(remaining)?;

            fields.apply(st)?;

            remaining = rest;
        }

        Ok(fields)
    }

    /// Populate the field for one AD structure
    fn apply(&mut self, st: AdStructRef<'a>) -> Result<(), DecodeError> {
        let Some(ad_type) = AdType::from_val(st.ad_type) else {
            log::trace!("skipping unknown AD type {:#04x}", st.ad_type);

            return Ok(());
        };

        let data = st.data;

        let bad_length = DecodeError::BadLength {
            ad_type: st.ad_type,
            len: data.len(),
        };

        match ad_type {
            AdType::Flags => {
                if data.len() != assigned::FLAGS_LEN {
                    return Err(bad_length);
                }

                self.flags = Some(data[0]);
            }

            AdType::IncompleteListOf16bitServiceClassUUIDs => {
                self.uuids16 = Some(ServiceUuids16::new(parse_uuids16(ad_type, data)?, false));
            }

            AdType::CompleteListOf16bitServiceClassUUIDs => {
                self.uuids16 = Some(ServiceUuids16::new(parse_uuids16(ad_type, data)?, true));
            }

            AdType::IncompleteListOf32bitServiceClassUUIDs => {
                self.uuids32 = Some(ServiceUuids32::new(parse_uuids32(ad_type, data)?, false));
            }

            AdType::CompleteListOf32bitServiceClassUUIDs => {
                self.uuids32 = Some(ServiceUuids32::new(parse_uuids32(ad_type, data)?, true));
            }

            AdType::IncompleteListOf128bitServiceClassUUIDs => {
                if data.len() % 16 != 0 {
                    return Err(bad_length);
                }

                self.uuids128 = Some(ServiceUuids128::new(data, false));
            }

            AdType::CompleteListOf128bitServiceClassUUIDs => {
                if data.len() % 16 != 0 {
                    return Err(bad_length);
                }

                self.uuids128 = Some(ServiceUuids128::new(data, true));
            }

            AdType::ShortenedLocalName => self.local_name = Some(LocalName::new(data, false)),

            AdType::CompleteLocalName => self.local_name = Some(LocalName::new(data, true)),

            AdType::TxPowerLevel => {
                if data.len() != assigned::TX_POWER_LEVEL_LEN {
                    return Err(bad_length);
                }

                self.tx_power_level = Some(TxPowerLevel::Level(data[0] as i8));
            }

            AdType::ClassOfDevice => {
                self.device_class = Some(data.try_into().map_err(|_| bad_length)?);
            }

            AdType::SlaveConnectionIntervalRange => {
                self.conn_interval_range = Some(data.try_into().map_err(|_| bad_length)?);
            }

            AdType::ServiceData16BitUUID => {
                if data.len() < assigned::SERVICE_DATA_UUID16_MIN_LEN {
                    return Err(bad_length);
                }

                self.service_data16 = Some(data);
            }

            AdType::PublicTargetAddress => {
                if data.len() % assigned::PUBLIC_TARGET_ADDRESS_ENTRY_LEN != 0 {
                    return Err(bad_length);
                }

                self.public_target_addresses = Some(data);
            }

            AdType::Appearance => {
                if data.len() != assigned::APPEARANCE_LEN {
                    return Err(bad_length);
                }

                self.appearance = Some(u16::from_le_bytes([data[0], data[1]]));
            }

            AdType::AdvertisingInterval => {
                if data.len() != assigned::ADVERTISING_INTERVAL_LEN {
                    return Err(bad_length);
                }

                self.advertising_interval = Some(u16::from_le_bytes([data[0], data[1]]));
            }

            AdType::LEBluetoothDeviceAddress => {
                self.le_address = Some(data.try_into().map_err(|_| bad_length)?);
            }

            AdType::LERole => {
                if data.len() != assigned::LE_ROLE_LEN {
                    return Err(bad_length);
                }

                self.le_role = Some(data[0]);
            }

            AdType::ServiceData32BitUUID => {
                if data.len() < assigned::SERVICE_DATA_UUID32_MIN_LEN {
                    return Err(bad_length);
                }

                self.service_data32 = Some(data);
            }

            AdType::ServiceData128BitUUID => {
                if data.len() < assigned::SERVICE_DATA_UUID128_MIN_LEN {
                    return Err(bad_length);
                }

                self.service_data128 = Some(data);
            }

            AdType::URI => self.uri = Some(data),

            AdType::ManufacturerSpecificData => self.manufacturer_data = Some(data),
        }

        Ok(())
    }
}
