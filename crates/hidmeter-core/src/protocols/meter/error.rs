use thiserror::Error;

/// Errors returned by the meter framing codecs.
///
/// # Examples
/// ```
/// use hidmeter_core::protocols::meter::{FramingError, decode_payload};
///
/// let err = decode_payload(&[0u8; 51]).unwrap_err();
/// assert!(matches!(err, FramingError::SizeMismatch { needed: 52, actual: 51, .. }));
/// assert!(err.to_string().contains("need 52 bytes, got 51"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("{layer} size mismatch: need {needed} bytes, got {actual}")]
    SizeMismatch {
        layer: Layer,
        needed: usize,
        actual: usize,
    },
    #[error("invalid reserved field: need exactly 7 bytes, got {actual}")]
    InvalidReserved { actual: usize },
    #[error("invalid free field: need exactly 3 bytes, got {actual}")]
    InvalidFree { actual: usize },
}

/// Protocol layer a size error was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Frame,
    SubPacket,
    Payload,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Layer::Frame => "frame",
            Layer::SubPacket => "sub-packet",
            Layer::Payload => "payload",
        };
        f.write_str(name)
    }
}
