#![allow(dead_code)]

use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ooxml_model::codec::{self, DecodeContext, Decoded, EncodeOptions, PartRoot};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> Result<String> {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).with_context(|| format!("failed to read fixture {:?}", path))
}

/// Single-line output without a declaration, convenient for string checks
pub fn compact() -> EncodeOptions {
    EncodeOptions {
        xml_declaration: false,
        indent: None,
    }
}

pub fn decode<T: PartRoot>(xml: &str) -> Result<Decoded<T>> {
    Ok(codec::from_str::<T>(xml, &DecodeContext::standard())?)
}

/// Decode a fixture and require that nothing was tolerated along the way
pub fn decode_fixture<T: PartRoot>(name: &str) -> Result<T> {
    let decoded = decode::<T>(&fixture(name)?)?;
    anyhow::ensure!(
        decoded.is_clean(),
        "{name} decoded with diagnostics: {:?}",
        decoded.diagnostics
    );
    Ok(decoded.value)
}

/// Encode `value`, decode the output and return it with the encoded text
pub fn reencode<T: PartRoot>(value: &T, options: &EncodeOptions) -> Result<(T, String)> {
    let xml = codec::to_string(value, options)?;
    let decoded = decode::<T>(&xml)?;
    anyhow::ensure!(
        decoded.is_clean(),
        "re-encoded part decoded with diagnostics: {:?}\n{xml}",
        decoded.diagnostics
    );
    Ok((decoded.value, xml))
}

pub fn assert_round_trip<T: PartRoot + Debug>(value: &T) -> Result<String> {
    let (again, xml) = reencode(value, &compact())?;
    assert_eq!(&again, value, "value changed across encode/decode:\n{xml}");
    Ok(xml)
}
