//! The advertising data field set
//!
//! [`AdvFields`] is the structured form of advertising or scan response data. Every AD type
//! supported by the codec is an optional field; any subset of them may be present. A field set is
//! built up by the user to be encoded, or produced whole by [`AdvFields::decode`].

use alloc::vec::Vec;

/// A list of 16-bit service class UUIDs
///
/// The UUIDs are owned by the list as they require conversion from their little endian wire form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceUuids16 {
    pub uuids: Vec<u16>,
    /// True for the *complete* list AD type, false for the *incomplete* one
    pub complete: bool,
}

impl ServiceUuids16 {
    pub fn new<T>(uuids: T, complete: bool) -> Self
    where
        T: Into<Vec<u16>>,
    {
        Self {
            uuids: uuids.into(),
            complete,
        }
    }
}

/// A list of 32-bit service class UUIDs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceUuids32 {
    pub uuids: Vec<u32>,
    /// True for the *complete* list AD type, false for the *incomplete* one
    pub complete: bool,
}

impl ServiceUuids32 {
    pub fn new<T>(uuids: T, complete: bool) -> Self
    where
        T: Into<Vec<u32>>,
    {
        Self {
            uuids: uuids.into(),
            complete,
        }
    }
}

/// A list of 128-bit service class UUIDs
///
/// 128-bit UUIDs are opaque 16 byte blobs on the wire, so the list borrows them from the buffer it
/// was decoded from instead of converting them. The borrowed bytes always hold a whole number of
/// UUIDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceUuids128<'a> {
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub uuids: &'a [u8],
    /// True for the *complete* list AD type, false for the *incomplete* one
    pub complete: bool,
}

impl<'a> ServiceUuids128<'a> {
    pub fn new(uuids: &'a [u8], complete: bool) -> Self {
        Self { uuids, complete }
    }

    /// The number of UUIDs in the list
    pub fn count(&self) -> usize {
        self.uuids.len() / 16
    }

    /// Iterate over the UUIDs in their little endian wire form
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> {
        self.uuids.chunks_exact(16)
    }
}

/// An advertised local name
///
/// The name borrows from the buffer it was decoded from. It is kept as raw bytes since a peer may
/// advertise a name that is not valid UTF-8 (a shortened name can be cut in the middle of a
/// character).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalName<'a> {
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub name: &'a [u8],
    /// True for the *complete local name* AD type, false for the *shortened* one
    pub complete: bool,
}

impl<'a> LocalName<'a> {
    pub fn new(name: &'a [u8], complete: bool) -> Self {
        Self { name, complete }
    }

    /// Try to get the name as a string
    pub fn as_str(&self) -> Result<&'a str, core::str::Utf8Error> {
        core::str::from_utf8(self.name)
    }
}

/// The advertised transmit power level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TxPowerLevel {
    /// Fill in the field by querying the radio's current power when encoding
    ///
    /// See [`TxPowerSource`](crate::TxPowerSource).
    Auto,
    /// An explicit power level in dBm
    Level(i8),
}

/// The advertising data field set
///
/// Each field corresponds to one AD type of the [`assigned`](crate::assigned) module. Only fields
/// that are `Some` are encoded, and only AD structures present in the input are `Some` after a
/// decode.
///
/// # Lifetime
/// Variable length fields that need no conversion from their wire form borrow from the buffer
/// given to [`decode`](AdvFields::decode), so the field set cannot outlive that buffer. A field
/// set built by hand for encoding borrows from whatever the user assigns to those fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvFields<'a> {
    /// Flags (AD type `0x01`)
    ///
    /// A value of zero is not encoded. The Core Specification Supplement prohibits advertising a
    /// flags value of zero, so a zero here means the flags are to be filled in by whatever layer
    /// knows the advertising type being used.
    pub flags: Option<u8>,
    /// Incomplete or complete list of 16-bit service class UUIDs (`0x02`/`0x03`)
    pub uuids16: Option<ServiceUuids16>,
    /// Incomplete or complete list of 32-bit service class UUIDs (`0x04`/`0x05`)
    pub uuids32: Option<ServiceUuids32>,
    /// Incomplete or complete list of 128-bit service class UUIDs (`0x06`/`0x07`)
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub uuids128: Option<ServiceUuids128<'a>>,
    /// Shortened or complete local name (`0x08`/`0x09`)
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub local_name: Option<LocalName<'a>>,
    /// Transmit power level (`0x0A`)
    pub tx_power_level: Option<TxPowerLevel>,
    /// Class of device (`0x0D`)
    pub device_class: Option<[u8; 3]>,
    /// Peripheral connection interval range (`0x12`)
    ///
    /// The minimum and maximum of the range, each as a little endian `u16` in units of 1.25 ms.
    pub conn_interval_range: Option<[u8; 4]>,
    /// Service data with a 16-bit UUID (`0x16`)
    ///
    /// The first two bytes are the UUID in little endian.
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub service_data16: Option<&'a [u8]>,
    /// Public target addresses (`0x17`), six bytes per address
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub public_target_addresses: Option<&'a [u8]>,
    /// Appearance (`0x19`)
    pub appearance: Option<u16>,
    /// Advertising interval (`0x1A`) in units of 0.625 ms
    pub advertising_interval: Option<u16>,
    /// LE Bluetooth device address (`0x1B`)
    ///
    /// Six bytes of address followed by one byte for the address type.
    pub le_address: Option<[u8; 7]>,
    /// LE role (`0x1C`)
    pub le_role: Option<u8>,
    /// Service data with a 32-bit UUID (`0x20`)
    ///
    /// The first four bytes are the UUID in little endian.
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub service_data32: Option<&'a [u8]>,
    /// Service data with a 128-bit UUID (`0x21`)
    ///
    /// The first sixteen bytes are the UUID in little endian.
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub service_data128: Option<&'a [u8]>,
    /// URI (`0x24`)
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub uri: Option<&'a [u8]>,
    /// Manufacturer specific data (`0xFF`)
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub manufacturer_data: Option<&'a [u8]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid128_list_iteration() {
        let raw: Vec<u8> = (0u8..32).collect();

        let list = ServiceUuids128::new(&raw, true);

        assert_eq!(list.count(), 2);

        let mut iter = list.iter();

        assert_eq!(iter.next(), Some(&raw[..16]));
        assert_eq!(iter.next(), Some(&raw[16..]));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn local_name_as_str() {
        assert_eq!(LocalName::new(b"gizmo", true).as_str(), Ok("gizmo"));

        // 0x80 is never valid UTF-8
        assert!(LocalName::new(&[0x80], false).as_str().is_err());
    }
}
