//! Content transfer-encoding and charset decoding.
//!
//! Text bodies go through two steps: the transfer encoding is reversed to
//! recover raw bytes, then those bytes are interpreted under the declared
//! charset.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::DecodeError;

/// Transfer encoding assumed when an entity declares none.
pub const DEFAULT_TRANSFER_ENCODING: &str = "7bit";

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses a transfer encoding name.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownTransferEncoding`] for names outside
    /// RFC 2045.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(Self::SevenBit),
            "8bit" => Ok(Self::EightBit),
            "base64" => Ok(Self::Base64),
            "quoted-printable" => Ok(Self::QuotedPrintable),
            "binary" => Ok(Self::Binary),
            _ => Err(DecodeError::UnknownTransferEncoding(s.to_string())),
        }
    }

    /// Reverses this encoding, producing raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not validly encoded.
    pub fn decode(self, data: &str) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::Base64 => decode_base64(data),
            Self::QuotedPrintable => decode_quoted_printable(data),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(data.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Decodes a text body: reverses `transfer_encoding`, then reads the bytes
/// as `charset`.
///
/// # Errors
///
/// Fails if the encoding name or charset is unknown, the encoded data is
/// malformed, or the bytes are not valid in the charset.
pub fn decode(text: &str, transfer_encoding: &str, charset: &str) -> Result<String, DecodeError> {
    let bytes = TransferEncoding::parse(transfer_encoding)?.decode(text)?;
    decode_charset(&bytes, charset)
}

/// Interprets bytes under the named charset.
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedCharset`] for unknown labels and
/// [`DecodeError::MalformedText`] for byte sequences invalid in the charset.
pub fn decode_charset(bytes: &[u8], charset: &str) -> Result<String, DecodeError> {
    let encoding = encoding_rs::Encoding::for_label_no_replacement(charset.trim().as_bytes())
        .ok_or_else(|| DecodeError::UnsupportedCharset(charset.to_string()))?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
        .ok_or_else(|| DecodeError::MalformedText {
            charset: encoding.name().to_string(),
        })
}

/// Decodes Base64 data, ignoring embedded line breaks and whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable data (RFC 2045) into raw bytes.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(data: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = data.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        match (bytes.get(i + 1), bytes.get(i + 2)) {
            // Soft line break
            (Some(b'\r'), Some(b'\n')) => i += 3,
            (Some(b'\n'), _) => i += 2,
            // Trailing '=' at end of body
            (None, _) => i += 1,
            (Some(&hi), Some(&lo)) => {
                let byte = hex_value(hi)
                    .zip(hex_value(lo))
                    .map(|(hi, lo)| hi << 4 | lo)
                    .ok_or_else(|| {
                        DecodeError::QuotedPrintable(format!(
                            "Invalid escape ={}{}",
                            hi as char, lo as char
                        ))
                    })?;
                result.push(byte);
                i += 3;
            }
            (Some(_), None) => {
                return Err(DecodeError::QuotedPrintable(
                    "Incomplete escape sequence".to_string(),
                ));
            }
        }
    }

    Ok(result)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(
            TransferEncoding::parse("7bit").unwrap(),
            TransferEncoding::SevenBit
        );
        assert_eq!(
            TransferEncoding::parse(" BASE64 ").unwrap(),
            TransferEncoding::Base64
        );
        assert_eq!(
            TransferEncoding::parse("Quoted-Printable").unwrap(),
            TransferEncoding::QuotedPrintable
        );
        assert!(matches!(
            TransferEncoding::parse("x-uuencode"),
            Err(DecodeError::UnknownTransferEncoding(_))
        ));
    }

    #[test]
    fn test_base64_with_line_breaks() {
        let decoded = decode_base64("SGVsbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_invalid() {
        assert!(matches!(decode_base64("!!!"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable("Hello, World!").unwrap(), b"Hello, World!");
        assert_eq!(
            decode_quoted_printable("H=C3=A9llo").unwrap(),
            "Héllo".as_bytes()
        );
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable("Hello=\r\nWorld").unwrap(), b"HelloWorld");
        assert_eq!(decode_quoted_printable("Hello=\nWorld").unwrap(), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_invalid_escape() {
        assert!(matches!(
            decode_quoted_printable("bad =ZZ escape"),
            Err(DecodeError::QuotedPrintable(_))
        ));
        assert!(decode_quoted_printable("cut =A").is_err());
    }

    #[test]
    fn test_decode_charset_latin1() {
        let text = decode_charset(&[0x63, 0x61, 0x66, 0xE9], "ISO-8859-1").unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_decode_unknown_charset() {
        assert!(matches!(
            decode_charset(b"abc", "x-klingon"),
            Err(DecodeError::UnsupportedCharset(_))
        ));
    }

    #[test]
    fn test_decode_malformed_utf8() {
        assert!(matches!(
            decode_charset(&[0xff, 0xfe, 0x41], "utf-8"),
            Err(DecodeError::MalformedText { .. })
        ));
    }

    #[test]
    fn test_decode_pipeline() {
        assert_eq!(decode("Y2Fm6Q==", "base64", "iso-8859-1").unwrap(), "café");
        assert_eq!(decode("caf=C3=A9", "quoted-printable", "UTF-8").unwrap(), "café");
        assert_eq!(decode("plain", "7bit", "us-ascii").unwrap(), "plain");
    }
}
