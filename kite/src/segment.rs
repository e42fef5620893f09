use uuid::Uuid;

use schema::FieldInfos;
use store::{Directory, IOContext};


pub const ID_LENGTH: usize = 16;


#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInfo {
    pub name: String,
    max_doc: u32,
    id: [u8; ID_LENGTH],
}


impl SegmentInfo {
    pub fn new(name: String, max_doc: u32, id: [u8; ID_LENGTH]) -> SegmentInfo {
        SegmentInfo {
            name: name,
            max_doc: max_doc,
            id: id,
        }
    }

    /// Creates a segment with a freshly generated id
    pub fn with_random_id(name: String, max_doc: u32) -> SegmentInfo {
        SegmentInfo::new(name, max_doc, SegmentInfo::new_random_id())
    }

    pub fn new_random_id() -> [u8; ID_LENGTH] {
        *Uuid::new_v4().as_bytes()
    }

    /// Number of documents in the segment
    #[inline]
    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    #[inline]
    pub fn id(&self) -> &[u8; ID_LENGTH] {
        &self.id
    }
}


/// Builds the name of a per-segment file
///
/// For example: `segment_file_name("_0", "Direct_0", "dvd")` is `_0_Direct_0.dvd`
pub fn segment_file_name(segment_name: &str, segment_suffix: &str, extension: &str) -> String {
    let mut name = segment_name.to_string();

    if !segment_suffix.is_empty() {
        name.push('_');
        name.push_str(segment_suffix);
    }

    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }

    name
}


/// Everything a codec needs to write its files for a segment
pub struct SegmentWriteState<'a> {
    pub directory: &'a dyn Directory,
    pub segment_info: &'a SegmentInfo,
    pub field_infos: &'a FieldInfos,
    pub segment_suffix: String,
    pub context: IOContext,
}


impl<'a> SegmentWriteState<'a> {
    pub fn new(directory: &'a dyn Directory, segment_info: &'a SegmentInfo, field_infos: &'a FieldInfos) -> SegmentWriteState<'a> {
        SegmentWriteState {
            directory: directory,
            segment_info: segment_info,
            field_infos: field_infos,
            segment_suffix: String::new(),
            context: IOContext::Flush { num_docs: segment_info.max_doc() },
        }
    }

    pub fn with_suffix(mut self, segment_suffix: &str) -> SegmentWriteState<'a> {
        self.segment_suffix = segment_suffix.to_string();
        self
    }
}


/// Everything a codec needs to open its files for a segment
pub struct SegmentReadState<'a> {
    pub directory: &'a dyn Directory,
    pub segment_info: &'a SegmentInfo,
    pub field_infos: &'a FieldInfos,
    pub segment_suffix: String,
    pub context: IOContext,
}


impl<'a> SegmentReadState<'a> {
    pub fn new(directory: &'a dyn Directory, segment_info: &'a SegmentInfo, field_infos: &'a FieldInfos) -> SegmentReadState<'a> {
        SegmentReadState {
            directory: directory,
            segment_info: segment_info,
            field_infos: field_infos,
            segment_suffix: String::new(),
            context: IOContext::Default,
        }
    }

    pub fn with_suffix(mut self, segment_suffix: &str) -> SegmentReadState<'a> {
        self.segment_suffix = segment_suffix.to_string();
        self
    }
}


#[cfg(test)]
mod tests {
    use super::{segment_file_name, SegmentInfo};

    #[test]
    fn test_segment_file_name() {
        assert_eq!(segment_file_name("_0", "", "dvdd"), "_0.dvdd");
        assert_eq!(segment_file_name("_0", "Direct_0", "dvdm"), "_0_Direct_0.dvdm");
        assert_eq!(segment_file_name("_1", "", ""), "_1");
    }

    #[test]
    fn test_random_ids_differ() {
        let a = SegmentInfo::with_random_id("_0".to_string(), 10);
        let b = SegmentInfo::with_random_id("_0".to_string(), 10);

        assert_eq!(a.max_doc(), 10);
        assert!(a.id() != b.id());
    }
}
