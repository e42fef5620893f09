//! The "direct" doc values format
//!
//! Values are stored uncompressed at a fixed width per field so they can be
//! loaded straight into arrays. Each segment gets two files:
//!
//! - `.dvdd` (data): per-field payloads, in the order fields were added
//! - `.dvdm` (metadata): one entry per field pointing into the data file,
//!   followed by an end-of-fields marker (`-1`)
//!
//! Both files start with an index header and end with a checksum footer.

use kite::{DocValuesType, SegmentWriteState, SegmentReadState};

use errors::Result;
use settings::DocValuesSettings;
use writer::DocValuesConsumer;
use reader::DocValuesProducer;


pub const DATA_CODEC: &'static str = "DirectDocValuesData";
pub const DATA_EXTENSION: &'static str = "dvdd";
pub const META_CODEC: &'static str = "DirectDocValuesMetadata";
pub const META_EXTENSION: &'static str = "dvdm";

pub const VERSION_START: i32 = 0;
pub const VERSION_CURRENT: i32 = VERSION_START;

/// Written in place of a field number after the last field
pub const END_OF_FIELDS: i32 = -1;


/// The type tag written before each field's entry in the metadata file
///
/// Tag values are part of the file format and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldEncoding {
    Number = 0,
    Bytes = 1,
    Sorted = 2,
    SortedSet = 3,
    SortedNumeric = 4,
}


impl FieldEncoding {
    pub fn from_tag(tag: u8) -> Option<FieldEncoding> {
        match tag {
            0 => Some(FieldEncoding::Number),
            1 => Some(FieldEncoding::Bytes),
            2 => Some(FieldEncoding::Sorted),
            3 => Some(FieldEncoding::SortedSet),
            4 => Some(FieldEncoding::SortedNumeric),
            _ => None,
        }
    }

    #[inline]
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn for_doc_values_type(doc_values_type: DocValuesType) -> FieldEncoding {
        match doc_values_type {
            DocValuesType::Numeric => FieldEncoding::Number,
            DocValuesType::Binary => FieldEncoding::Bytes,
            DocValuesType::Sorted => FieldEncoding::Sorted,
            DocValuesType::SortedSet => FieldEncoding::SortedSet,
            DocValuesType::SortedNumeric => FieldEncoding::SortedNumeric,
        }
    }

    pub fn doc_values_type(&self) -> DocValuesType {
        match *self {
            FieldEncoding::Number => DocValuesType::Numeric,
            FieldEncoding::Bytes => DocValuesType::Binary,
            FieldEncoding::Sorted => DocValuesType::Sorted,
            FieldEncoding::SortedSet => DocValuesType::SortedSet,
            FieldEncoding::SortedNumeric => DocValuesType::SortedNumeric,
        }
    }
}


/// Entry point for writing and reading direct doc values
#[derive(Debug, Clone, Default)]
pub struct DirectDocValuesFormat {
    settings: DocValuesSettings,
}


impl DirectDocValuesFormat {
    pub fn new() -> DirectDocValuesFormat {
        DirectDocValuesFormat::default()
    }

    pub fn with_settings(settings: DocValuesSettings) -> DirectDocValuesFormat {
        DirectDocValuesFormat {
            settings: settings,
        }
    }

    pub fn settings(&self) -> &DocValuesSettings {
        &self.settings
    }

    pub fn fields_consumer(&self, state: &SegmentWriteState) -> Result<DocValuesConsumer> {
        DocValuesConsumer::new(state, self.settings.clone())
    }

    pub fn fields_producer(&self, state: &SegmentReadState) -> Result<DocValuesProducer> {
        DocValuesProducer::open(state)
    }
}


#[cfg(test)]
mod tests {
    use kite::DocValuesType;

    use super::FieldEncoding;

    #[test]
    fn test_tags_are_stable() {
        assert_eq!(FieldEncoding::Number.tag(), 0);
        assert_eq!(FieldEncoding::Bytes.tag(), 1);
        assert_eq!(FieldEncoding::Sorted.tag(), 2);
        assert_eq!(FieldEncoding::SortedSet.tag(), 3);
        assert_eq!(FieldEncoding::SortedNumeric.tag(), 4);
        assert_eq!(FieldEncoding::from_tag(5), None);
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in 0..5 {
            let encoding = FieldEncoding::from_tag(tag).unwrap();
            assert_eq!(encoding.tag(), tag);
            assert_eq!(FieldEncoding::for_doc_values_type(encoding.doc_values_type()), encoding);
        }
    }

    #[test]
    fn test_doc_values_type() {
        assert_eq!(FieldEncoding::SortedSet.doc_values_type(), DocValuesType::SortedSet);
        assert_eq!(FieldEncoding::for_doc_values_type(DocValuesType::Binary), FieldEncoding::Bytes);
    }
}
