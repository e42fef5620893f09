//! Uncompressed doc values for kite segments
//!
//! Doc values are per-document column values stored alongside the inverted
//! index, used for sorting, faceting and scoring. This crate writes and reads
//! them in the "direct" format: fixed-width arrays that can be loaded with no
//! decoding beyond byte order.
//!
//! Five kinds of field are supported:
//!
//! - numeric: one optional integer per document
//! - binary: one optional byte array per document
//! - sorted: one optional value per document, from a sorted dictionary
//! - sorted set: any number of dictionary values per document
//! - sorted numeric: any number of integers per document

#[macro_use]
extern crate log;
extern crate byteorder;
extern crate roaring;
#[cfg_attr(test, macro_use)]
extern crate serde_json;
extern crate kite;

pub mod errors;
pub mod settings;
pub mod settings_parser;
pub mod values;
pub mod format;
pub mod writer;
pub mod reader;

pub use errors::{DocValuesError, OverflowError, LimitKind, Result};
pub use settings::DocValuesSettings;
pub use values::{ValueSource, CountToAddress};
pub use format::{DirectDocValuesFormat, FieldEncoding};
pub use writer::DocValuesConsumer;
pub use reader::DocValuesProducer;
pub use reader::doc_values::{NumericDocValues, BinaryDocValues, SortedDocValues, SortedSetDocValues, SortedNumericDocValues};
