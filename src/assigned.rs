//! Assigned numbers for advertising data types
//!
//! The assigned numbers for GAP come from the Bluetooth SIG and can be found on the official
//! [Bluetooth](https://www.bluetooth.com/specifications/assigned-numbers/) webpage. An AD type
//! identifies the meaning and data format of an AD structure to whoever receives it.

/// AD types supported by this codec
///
/// These are the assigned numbers that [`AdvFields`](crate::AdvFields) has a field for. Decoding
/// skips over any AD structure whose type is not in this list.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AdType {
    Flags,
    IncompleteListOf16bitServiceClassUUIDs,
    CompleteListOf16bitServiceClassUUIDs,
    IncompleteListOf32bitServiceClassUUIDs,
    CompleteListOf32bitServiceClassUUIDs,
    IncompleteListOf128bitServiceClassUUIDs,
    CompleteListOf128bitServiceClassUUIDs,
    ShortenedLocalName,
    CompleteLocalName,
    TxPowerLevel,
    ClassOfDevice,
    SlaveConnectionIntervalRange,
    ServiceData16BitUUID,
    PublicTargetAddress,
    Appearance,
    AdvertisingInterval,
    LEBluetoothDeviceAddress,
    LERole,
    ServiceData32BitUUID,
    ServiceData128BitUUID,
    URI,
    ManufacturerSpecificData,
}

impl AdType {
    /// The assigned number
    pub const fn val(self) -> u8 {
        match self {
            AdType::Flags => 0x01,
            AdType::IncompleteListOf16bitServiceClassUUIDs => 0x02,
            AdType::CompleteListOf16bitServiceClassUUIDs => 0x03,
            AdType::IncompleteListOf32bitServiceClassUUIDs => 0x04,
            AdType::CompleteListOf32bitServiceClassUUIDs => 0x05,
            AdType::IncompleteListOf128bitServiceClassUUIDs => 0x06,
            AdType::CompleteListOf128bitServiceClassUUIDs => 0x07,
            AdType::ShortenedLocalName => 0x08,
            AdType::CompleteLocalName => 0x09,
            AdType::TxPowerLevel => 0x0A,
            AdType::ClassOfDevice => 0x0D,
            AdType::SlaveConnectionIntervalRange => 0x12,
            AdType::ServiceData16BitUUID => 0x16,
            AdType::PublicTargetAddress => 0x17,
            AdType::Appearance => 0x19,
            AdType::AdvertisingInterval => 0x1A,
            AdType::LEBluetoothDeviceAddress => 0x1B,
            AdType::LERole => 0x1C,
            AdType::ServiceData32BitUUID => 0x20,
            AdType::ServiceData128BitUUID => 0x21,
            AdType::URI => 0x24,
            AdType::ManufacturerSpecificData => 0xFF,
        }
    }

    /// Try to map an assigned number to a supported AD type
    ///
    /// `None` is returned for any assigned number this codec has no field for.
    pub fn from_val(val: u8) -> Option<AdType> {
        match val {
            0x01 => Some(AdType::Flags),
            0x02 => Some(AdType::IncompleteListOf16bitServiceClassUUIDs),
            0x03 => Some(AdType::CompleteListOf16bitServiceClassUUIDs),
            0x04 => Some(AdType::IncompleteListOf32bitServiceClassUUIDs),
            0x05 => Some(AdType::CompleteListOf32bitServiceClassUUIDs),
            0x06 => Some(AdType::IncompleteListOf128bitServiceClassUUIDs),
            0x07 => Some(AdType::CompleteListOf128bitServiceClassUUIDs),
            0x08 => Some(AdType::ShortenedLocalName),
            0x09 => Some(AdType::CompleteLocalName),
            0x0A => Some(AdType::TxPowerLevel),
            0x0D => Some(AdType::ClassOfDevice),
            0x12 => Some(AdType::SlaveConnectionIntervalRange),
            0x16 => Some(AdType::ServiceData16BitUUID),
            0x17 => Some(AdType::PublicTargetAddress),
            0x19 => Some(AdType::Appearance),
            0x1A => Some(AdType::AdvertisingInterval),
            0x1B => Some(AdType::LEBluetoothDeviceAddress),
            0x1C => Some(AdType::LERole),
            0x20 => Some(AdType::ServiceData32BitUUID),
            0x21 => Some(AdType::ServiceData128BitUUID),
            0x24 => Some(AdType::URI),
            0xFF => Some(AdType::ManufacturerSpecificData),
            _ => None,
        }
    }
}

/// Data length of the flags AD structure
pub const FLAGS_LEN: usize = 1;

/// Data length of the transmit power level AD structure
pub const TX_POWER_LEVEL_LEN: usize = 1;

/// Data length of the class of device AD structure
pub const CLASS_OF_DEVICE_LEN: usize = 3;

/// Data length of the connection interval range AD structure
pub const CONN_INTERVAL_RANGE_LEN: usize = 4;

/// Minimum data length of the 16-bit UUID service data AD structure
pub const SERVICE_DATA_UUID16_MIN_LEN: usize = 2;

/// Length of one entry in the public target address AD structure
pub const PUBLIC_TARGET_ADDRESS_ENTRY_LEN: usize = 6;

/// Data length of the appearance AD structure
pub const APPEARANCE_LEN: usize = 2;

/// Data length of the advertising interval AD structure
pub const ADVERTISING_INTERVAL_LEN: usize = 2;

/// Data length of the LE Bluetooth device address AD structure
///
/// Six bytes of device address followed by one byte for the address type.
pub const LE_ADDRESS_LEN: usize = 7;

/// Data length of the LE role AD structure
pub const LE_ROLE_LEN: usize = 1;

/// Minimum data length of the 32-bit UUID service data AD structure
pub const SERVICE_DATA_UUID32_MIN_LEN: usize = 4;

/// Minimum data length of the 128-bit UUID service data AD structure
pub const SERVICE_DATA_UUID128_MIN_LEN: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_numbers_round_trip() {
        for val in 0..=255u8 {
            if let Some(ad_type) = AdType::from_val(val) {
                assert_eq!(ad_type.val(), val);
            }
        }
    }
}
