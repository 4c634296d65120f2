#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod assigned;
pub mod de;
pub mod fields;
pub mod ser;

pub use assigned::AdType;
pub use fields::{AdvFields, LocalName, ServiceUuids128, ServiceUuids16, ServiceUuids32, TxPowerLevel};
pub use ser::TxPowerSource;

/// The size of the header of an AD structure
///
/// The full size of an AD structure is this plus the size of its data.
pub const HEADER_SIZE: usize = 2;

/// The advertising data size of legacy advertising PDUs
///
/// This is the most common maximum used for the buffer given to
/// [`AdvFields::encode`]. The codec itself accepts any buffer size.
pub const LEGACY_ADV_DATA_MAX: usize = 31;

/// The largest supported data length of a single AD structure
///
/// Decoding fails with [`DecodeError::FieldTooLarge`] for any structure whose
/// data is longer than this.
pub const MAX_FIELD_LEN: usize = LEGACY_ADV_DATA_MAX - HEADER_SIZE;

/// The error of decoding advertising data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// An AD structure claims more bytes than remain in the input
    Truncated { required: usize, remaining: usize },
    /// An AD structure has a length byte of zero, leaving no room for its type byte
    ZeroLength,
    /// The data of an AD structure is larger than [`MAX_FIELD_LEN`]
    FieldTooLarge { len: usize },
    /// The data length does not match the format required by the AD type
    BadLength { ad_type: u8, len: usize },
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            DecodeError::Truncated { required, remaining } => write!(
                f,
                "AD structure requires {} bytes but only {} bytes remain",
                required, remaining
            ),
            DecodeError::ZeroLength => write!(f, "AD structure has a length of zero"),
            DecodeError::FieldTooLarge { len } => write!(
                f,
                "AD structure data is {} bytes, larger than the supported maximum of {} bytes",
                len, MAX_FIELD_LEN
            ),
            DecodeError::BadLength { ad_type, len } => write!(
                f,
                "invalid data length of {} for AD type {:#04x}",
                len, ad_type
            ),
        }
    }
}

/// The error of encoding a field set into advertising data
///
/// `E` is the error of the [`TxPowerSource`] used for the encode. It only
/// occurs when the transmit power level field is set to
/// [`TxPowerLevel::Auto`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError<E> {
    /// A field would not fit within the remaining bytes of the buffer
    DataTooLarge { required: usize, remaining: usize },
    /// The crate was built without the `advertise` feature
    NotSupported,
    /// The transmit power query failed
    TxPower(E),
}

impl<E: core::fmt::Display> core::fmt::Display for EncodeError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            EncodeError::DataTooLarge { required, remaining } => write!(
                f,
                "field requires {} bytes but only {} bytes remain in the advertising data buffer",
                required, remaining
            ),
            EncodeError::NotSupported => write!(f, "advertising data encoding is not supported"),
            EncodeError::TxPower(e) => write!(f, "failed to read the transmit power: {}", e),
        }
    }
}
