//! Strategies for turning a fetched body part into readable text.

use encoding_rs::WINDOWS_1252;

use quoted_printable::qp_decode;

/// Recovers readable content from a raw body part.
///
/// Decoding never fails: a decoder that cannot make sense of its input
/// returns the input as text.
pub trait ContentDecoder {
    fn decode(&self, raw: &[u8]) -> String;
}

impl<F> ContentDecoder for F
where
    F: Fn(&[u8]) -> String,
{
    fn decode(&self, raw: &[u8]) -> String {
        self(raw)
    }
}

/// Strict base64, falling back to the raw content.
///
/// Line breaks and other ASCII whitespace are ignored. Anything else outside
/// the base64 alphabet, or a decoded result that is empty, makes the decoder
/// return the input unchanged. Decoded bytes that are not UTF-8 are read as
/// windows-1252, the usual Latin-1 superset of untagged mail text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64Decoder;

impl ContentDecoder for Base64Decoder {
    fn decode(&self, raw: &[u8]) -> String {
        let compact: Vec<u8> = raw
            .iter()
            .cloned()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        match base64::decode(&compact) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return String::from_utf8_lossy(raw).into_owned();
                }
                match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(err) => {
                        trace!("Base64 content is not UTF-8, reading it as windows-1252");
                        let (text, _) = WINDOWS_1252.decode_without_bom_handling(err.as_bytes());
                        text.into_owned()
                    }
                }
            }
            Err(_) => String::from_utf8_lossy(raw).into_owned(),
        }
    }
}

/// Returns the content as it was fetched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl ContentDecoder for PassThrough {
    fn decode(&self, raw: &[u8]) -> String {
        String::from_utf8_lossy(raw).into_owned()
    }
}

/// Quoted-printable content, for servers that send text parts that way.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuotedPrintableDecoder;

impl ContentDecoder for QuotedPrintableDecoder {
    fn decode(&self, raw: &[u8]) -> String {
        String::from_utf8_lossy(&qp_decode(raw)).into_owned()
    }
}
