//! PlantUML text encoding.
//!
//! PlantUML services accept diagram source in the URL: the text is
//! compressed with raw deflate and then base64 encoded with PlantUML's own
//! alphabet (`0-9A-Za-z-_`, no padding). The `~1` marker before the payload
//! tells the service the encoding is deflate based.

use std::io::{self, Write as _};

use base64::{
    Engine as _,
    alphabet::Alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use flate2::{Compression, write::DeflateEncoder};
use thiserror::Error;

const PLANTUML_ALPHABET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &match Alphabet::new(PLANTUML_ALPHABET) {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    },
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Errors raised while encoding diagram source.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to compress diagram source: {0}")]
    Compress(#[from] io::Error),
}

/// Compresses and encodes `source` into a PlantUML URL payload.
///
/// The result is a pure function of `source`.
///
/// # Errors
///
/// Returns [`EncodeError::Compress`] if the deflate stream cannot be written.
pub fn encode(source: &str) -> Result<String, EncodeError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(source.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(PLANTUML_ENGINE.encode(compressed))
}

/// Builds the SVG URL for `source` on the PlantUML `service`.
///
/// # Errors
///
/// Returns an [`EncodeError`] if `source` cannot be encoded.
pub fn svg_url(service: &str, source: &str) -> Result<String, EncodeError> {
    let payload = encode(source)?;
    Ok(format!("{}/svg/~1{payload}", service.trim_end_matches('/')))
}
