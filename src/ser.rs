//! Encoding of a field set into advertising data
//!
//! [`AdvFields::encode`] walks the fields in ascending AD type order and appends one AD structure
//! per present field to the output buffer. The buffer's length is the maximum advertising data
//! size; for legacy advertising PDUs this is [`LEGACY_ADV_DATA_MAX`](crate::LEGACY_ADV_DATA_MAX)
//! bytes.

use crate::assigned::AdType;
use crate::fields::{AdvFields, TxPowerLevel};
use crate::{EncodeError, HEADER_SIZE};

/// A source for the radio's current transmit power
///
/// This is the one thing outside the codec that encoding needs. When the transmit power level
/// field is [`TxPowerLevel::Auto`], the orchestration of the encode queries this source for the
/// level to put in the AD structure. The query's error is returned from the encode untouched.
///
/// The trait is implemented for any `FnMut() -> Result<i8, E>` closure, with the returned value
/// in dBm.
pub trait TxPowerSource {
    type Error;

    /// Read the current transmit power in dBm
    fn read_tx_power(&mut self) -> Result<i8, Self::Error>;
}

impl<E, F> TxPowerSource for F
where
    F: FnMut() -> Result<i8, E>,
{
    type Error = E;

    fn read_tx_power(&mut self) -> Result<i8, E> {
        self()
    }
}

/// Writer of AD structures into an advertising data buffer
///
/// The buffer's full length is the maximum advertising data size. Every write is atomic: if a
/// structure does not fit within the remaining bytes, nothing is written and `len` is unchanged.
struct AdWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> AdWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        AdWriter { buf, len: 0 }
    }

    /// Write the `[length][type]` header of an AD structure
    ///
    /// The header is only written if the header *and* `data_len` bytes of data fit within the
    /// buffer, which is what makes each structure's encoding atomic.
    fn header<E>(&mut self, ad_type: AdType, data_len: usize) -> Result<(), EncodeError<E>> {
        let required = HEADER_SIZE + data_len;
        let remaining = self.buf.len() - self.len;

        // The length byte holds the data length plus one for the type byte
        if required > remaining || data_len + 1 > u8::MAX as usize {
            return Err(EncodeError::DataTooLarge { required, remaining });
        }

        self.buf[self.len] = (data_len + 1) as u8;
        self.buf[self.len + 1] = ad_type.val();

        self.len += HEADER_SIZE;

        Ok(())
    }

    /// Write an AD structure with its data copied verbatim
    fn flat<E>(&mut self, ad_type: AdType, data: &[u8]) -> Result<(), EncodeError<E>> {
        self.header(ad_type, data.len())?;

        self.buf[self.len..self.len + data.len()].copy_from_slice(data);

        self.len += data.len();

        Ok(())
    }

    /// Write an AD structure of little endian 16-bit elements
    fn array16<E>(&mut self, ad_type: AdType, elems: &[u16]) -> Result<(), EncodeError<E>> {
        self.header(ad_type, elems.len() * 2)?;

        for elem in elems {
            self.buf[self.len..self.len + 2].copy_from_slice(&elem.to_le_bytes());

            self.len += 2;
        }

        Ok(())
    }

    /// Write an AD structure of little endian 32-bit elements
    fn array32<E>(&mut self, ad_type: AdType, elems: &[u32]) -> Result<(), EncodeError<E>> {
        self.header(ad_type, elems.len() * 4)?;

        for elem in elems {
            self.buf[self.len..self.len + 4].copy_from_slice(&elem.to_le_bytes());

            self.len += 4;
        }

        Ok(())
    }
}

impl AdvFields<'_> {
    /// Encode the field set into `dst`
    ///
    /// Every present field is appended to `dst` as an AD structure, in ascending AD type order.
    /// The length of `dst` is the maximum advertising data size. The return is the number of
    /// bytes of `dst` that were used.
    ///
    /// `tx` is only queried when the transmit power level field is [`TxPowerLevel::Auto`].
    ///
    /// ```
    /// # use ble_adv_fields::AdvFields;
    /// let mut fields = AdvFields::default();
    ///
    /// fields.flags = Some(0x6);
    ///
    /// let mut buffer = [0u8; 31];
    ///
    /// let len = fields.encode(&mut buffer, || Ok::<i8, ()>(0)).unwrap();
    ///
    /// assert_eq!(&buffer[..len], &[0x2, 0x1, 0x6]);
    /// ```
    ///
    /// # Errors
    /// The encode returns at the first field that does not fit within the remaining bytes of
    /// `dst`. Structures already written stay in `dst`, the failed field and every field after it
    /// are left out. A failure of `tx` is returned as [`EncodeError::TxPower`] and also ends the
    /// encode.
    pub fn encode<T>(&self, dst: &mut [u8], mut tx: T) -> Result<usize, EncodeError<T::Error>>
    where
        T: TxPowerSource,
    {
        // Capability check for hosts built without the encode half of the codec
        if cfg!(not(feature = "advertise")) {
            return Err(EncodeError::NotSupported);
        }

        let mut w = AdWriter::new(dst);

        // A flags value of zero is reserved to mean "filled in later by the advertiser", as the
        // Core Specification Supplement prohibits advertising zero.
        if let Some(flags) = self.flags {
            if flags != 0 {
                w.flat(AdType::Flags, &[flags])?;
            }
        }

        if let Some(list) = &self.uuids16 {
            if !list.uuids.is_empty() {
                let ad_type = if list.complete {
                    AdType::CompleteListOf16bitServiceClassUUIDs
                } else {
                    AdType::IncompleteListOf16bitServiceClassUUIDs
                };

                w.array16(ad_type, &list.uuids)?;
            }
        }

        if let Some(list) = &self.uuids32 {
            if !list.uuids.is_empty() {
                let ad_type = if list.complete {
                    AdType::CompleteListOf32bitServiceClassUUIDs
                } else {
                    AdType::IncompleteListOf32bitServiceClassUUIDs
                };

                w.array32(ad_type, &list.uuids)?;
            }
        }

        if let Some(list) = &self.uuids128 {
            if !list.uuids.is_empty() {
                let ad_type = if list.complete {
                    AdType::CompleteListOf128bitServiceClassUUIDs
                } else {
                    AdType::IncompleteListOf128bitServiceClassUUIDs
                };

                w.flat(ad_type, list.uuids)?;
            }
        }

        if let Some(name) = &self.local_name {
            if !name.name.is_empty() {
                let ad_type = if name.complete {
                    AdType::CompleteLocalName
                } else {
                    AdType::ShortenedLocalName
                };

                w.flat(ad_type, name.name)?;
            }
        }

        if let Some(tx_power) = self.tx_power_level {
            let level = match tx_power {
                TxPowerLevel::Level(level) => level,
                TxPowerLevel::Auto => tx.read_tx_power().map_err(EncodeError::TxPower)?,
            };

            w.flat(AdType::TxPowerLevel, &[level as u8])?;
        }

        if let Some(class) = &self.device_class {
            w.flat(AdType::ClassOfDevice, class)?;
        }

        if let Some(range) = &self.conn_interval_range {
            w.flat(AdType::SlaveConnectionIntervalRange, range)?;
        }

        if let Some(data) = self.service_data16 {
            w.flat(AdType::ServiceData16BitUUID, data)?;
        }

        if let Some(addresses) = self.public_target_addresses {
            if !addresses.is_empty() {
                w.flat(AdType::PublicTargetAddress, addresses)?;
            }
        }

        if let Some(appearance) = self.appearance {
            w.flat(AdType::Appearance, &appearance.to_le_bytes())?;
        }

        if let Some(interval) = self.advertising_interval {
            w.flat(AdType::AdvertisingInterval, &interval.to_le_bytes())?;
        }

        if let Some(address) = &self.le_address {
            w.flat(AdType::LEBluetoothDeviceAddress, address)?;
        }

        if let Some(role) = self.le_role {
            w.flat(AdType::LERole, &[role])?;
        }

        if let Some(data) = self.service_data32 {
            w.flat(AdType::ServiceData32BitUUID, data)?;
        }

        if let Some(data) = self.service_data128 {
            w.flat(AdType::ServiceData128BitUUID, data)?;
        }

        if let Some(uri) = self.uri {
            w.flat(AdType::URI, uri)?;
        }

        if let Some(data) = self.manufacturer_data {
            w.flat(AdType::ManufacturerSpecificData, data)?;
        }

        Ok(w.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{LocalName, ServiceUuids128, ServiceUuids16, ServiceUuids32};

    /// For encodes that must not query the transmit power
    fn no_radio() -> Result<i8, core::convert::Infallible> {
        panic!("unexpected transmit power query")
    }

    #[test]
    fn encode_flags() {
        let mut fields = AdvFields::default();

        fields.flags = Some(0x6);

        let mut buffer = [0u8; 31];

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(len, 3);
        assert_eq!(&buffer[..len], &[0x2, 0x1, 0x6]);
    }

    #[test]
    fn zero_flags_are_not_encoded() {
        let mut fields = AdvFields::default();

        fields.flags = Some(0);

        let mut buffer = [0u8; 31];

        assert_eq!(fields.encode(&mut buffer, no_radio), Ok(0));
    }

    #[test]
    fn encode_uuid_lists_little_endian() {
        let mut fields = AdvFields::default();

        fields.uuids16 = Some(ServiceUuids16::new([0x1234u16, 0x5678], true));
        fields.uuids32 = Some(ServiceUuids32::new([0x9ABC_DEF0u32], false));

        let mut buffer = [0u8; 31];

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(
            &buffer[..len],
            &[
                0x5, 0x3, 0x34, 0x12, 0x78, 0x56, // complete 16-bit list
                0x5, 0x4, 0xF0, 0xDE, 0xBC, 0x9A, // incomplete 32-bit list
            ]
        );
    }

    #[test]
    fn complete_and_shortened_name_types() {
        let mut buffer = [0u8; 31];

        let mut fields = AdvFields::default();

        fields.local_name = Some(LocalName::new(b"Foo", true));

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(&buffer[..len], &[0x4, 0x9, b'F', b'o', b'o']);

        fields.local_name = Some(LocalName::new(b"Foo", false));

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(&buffer[..len], &[0x4, 0x8, b'F', b'o', b'o']);
    }

    #[test]
    fn fields_encoded_in_ascending_type_order() {
        let mut fields = AdvFields::default();

        fields.manufacturer_data = Some(&[0xE5, 0x02, 0xAB]);
        fields.tx_power_level = Some(TxPowerLevel::Level(-8));
        fields.flags = Some(0x6);
        fields.appearance = Some(0x03C1);
        fields.le_role = Some(0x2);

        let mut buffer = [0u8; 31];

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(
            &buffer[..len],
            &[
                0x2, 0x01, 0x6, // flags
                0x2, 0x0A, 0xF8, // tx power level, -8 dBm
                0x3, 0x19, 0xC1, 0x03, // appearance
                0x2, 0x1C, 0x2, // le role
                0x4, 0xFF, 0xE5, 0x02, 0xAB, // manufacturer data
            ]
        );
    }

    #[test]
    fn encode_fixed_size_fields() {
        let mut fields = AdvFields::default();

        fields.device_class = Some([0x04, 0x04, 0x24]);
        fields.conn_interval_range = Some([0x06, 0x00, 0x80, 0x0C]);
        fields.le_address = Some([0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0x00]);
        fields.advertising_interval = Some(0x0800);

        let mut buffer = [0u8; 31];

        let len = fields.encode(&mut buffer, no_radio).unwrap();

        assert_eq!(
            &buffer[..len],
            &[
                0x4, 0x0D, 0x04, 0x04, 0x24, // class of device
                0x5, 0x12, 0x06, 0x00, 0x80, 0x0C, // connection interval range
                0x3, 0x1A, 0x00, 0x08, // advertising interval
                0x8, 0x1B, 0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0x00, // le address
            ]
        );
    }

    #[test]
    fn auto_tx_power_queries_the_source() {
        let mut fields = AdvFields::default();

        fields.tx_power_level = Some(TxPowerLevel::Auto);

        let mut buffer = [0u8; 31];

        let len = fields.encode(&mut buffer, || Ok::<i8, ()>(-4)).unwrap();

        assert_eq!(&buffer[..len], &[0x2, 0x0A, 0xFC]);
    }

    #[test]
    fn tx_power_query_failure_is_propagated() {
        let mut fields = AdvFields::default();

        fields.flags = Some(0x6);
        fields.tx_power_level = Some(TxPowerLevel::Auto);

        let mut buffer = [0u8; 31];

        let err = fields.encode(&mut buffer, || Err::<i8, _>("hci timeout")).unwrap_err();

        assert_eq!(err, EncodeError::TxPower("hci timeout"));

        // the flags field before the failing one was still written
        assert_eq!(&buffer[..3], &[0x2, 0x1, 0x6]);
    }

    #[test]
    fn field_too_large_for_buffer() {
        let mut fields = AdvFields::default();

        fields.local_name = Some(LocalName::new(b"Foo", true));

        let mut buffer = [0u8; 4];

        let err = fields.encode(&mut buffer, no_radio).unwrap_err();

        assert_eq!(
            err,
            EncodeError::DataTooLarge {
                required: 5,
                remaining: 4
            }
        );

        // nothing was written for the failed field
        assert_eq!(buffer, [0u8; 4]);
    }

    #[test]
    fn failed_field_leaves_prior_fields_intact() {
        let mut fields = AdvFields::default();

        fields.flags = Some(0x6);
        fields.manufacturer_data = Some(&[0u8; 29]);

        let mut buffer = [0u8; 31];

        let err = fields.encode(&mut buffer, no_radio).unwrap_err();

        assert_eq!(
            err,
            EncodeError::DataTooLarge {
                required: 31,
                remaining: 28
            }
        );

        assert_eq!(&buffer[..3], &[0x2, 0x1, 0x6]);
    }

    #[cfg(not(feature = "advertise"))]
    #[test]
    fn encode_not_supported() {
        let fields = AdvFields::default();

        let mut buffer = [0u8; 31];

        assert_eq!(
            fields.encode(&mut buffer, no_radio),
            Err(EncodeError::NotSupported)
        );
    }
}
