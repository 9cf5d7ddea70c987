//! Reading AC-series `.dat` files: encoding resolution, header and body extraction.

mod encoding;
mod model;
mod parser;

pub use encoding::{CANDIDATE_ENCODINGS, DecodedText, TextEncoding, decode_with_candidates};
pub use model::{BackgroundMode, InstrumentRecord, SampleSeries};
pub(crate) use model::prefix;
pub use parser::{
    BODY_COLUMN_COUNT, HEADER_ROW_COUNT, ParsedRecord, extend_legacy_layout, parse_record_bytes,
    parse_record_text, parse_rows, split_rows,
};
