//! Infrastructure layer
//!
//! Concrete loaders for the fleet dataset and the ZIP coordinate
//! gazetteer that backs geocoding.

pub mod dataset;
pub mod zip_table;

pub use dataset::{load_raw_records, parse_raw_records};
pub use zip_table::ZipTable;

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::warn;

/// Decode file bytes, honoring a BOM, else UTF-8 with a Windows-1252
/// fallback for legacy spreadsheet exports.
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            warn!(encoding = encoding.name(), "some characters could not be decoded");
        }
        return text;
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => {
            warn!("input is not valid UTF-8, decoding as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}
