pub mod bitset;
pub mod numeric;
pub mod binary;

use std::collections::HashSet;
use std::io;

use kite::{DocValuesType, FieldInfo, SegmentWriteState};
use kite::codec_util;
use kite::segment::segment_file_name;
use kite::store::{DataOutput, IndexOutput};
use kite::store::io_utils;

use errors::{DocValuesError, Result};
use format::{FieldEncoding, DATA_CODEC, DATA_EXTENSION, META_CODEC, META_EXTENSION, VERSION_CURRENT, END_OF_FIELDS};
use settings::DocValuesSettings;
use values::{ValueSource, CountToAddress};
use writer::numeric::write_numeric;
use writer::binary::write_binary;


/// Writes the doc values of one segment
///
/// Each field is written in full by a single `add_*` call, in call order.
/// Both files are finished by `close`. If the consumer is dropped without
/// being closed, the files are released without footers and won't be
/// readable.
pub struct DocValuesConsumer {
    data: Option<Box<dyn IndexOutput>>,
    meta: Option<Box<dyn IndexOutput>>,
    settings: DocValuesSettings,
    written_fields: HashSet<u32>,
    aborted: bool,
}


impl DocValuesConsumer {
    pub fn new(state: &SegmentWriteState, settings: DocValuesSettings) -> Result<DocValuesConsumer> {
        let mut consumer = DocValuesConsumer {
            data: None,
            meta: None,
            settings: settings,
            written_fields: HashSet::new(),
            aborted: false,
        };

        if let Err(e) = consumer.open_outputs(state) {
            io_utils::close_while_handling_error(vec![consumer.data.take(), consumer.meta.take()]);
            return Err(e);
        }

        debug!("writing doc values for segment {} ({} docs)", state.segment_info.name, state.segment_info.max_doc());

        Ok(consumer)
    }

    fn open_outputs(&mut self, state: &SegmentWriteState) -> Result<()> {
        let id = state.segment_info.id();

        let data_name = segment_file_name(&state.segment_info.name, &state.segment_suffix, DATA_EXTENSION);
        let data = self.data.get_or_insert(state.directory.create_output(&data_name, &state.context)?);
        codec_util::write_index_header(&mut **data, DATA_CODEC, VERSION_CURRENT, id, &state.segment_suffix)?;

        let meta_name = segment_file_name(&state.segment_info.name, &state.segment_suffix, META_EXTENSION);
        let meta = self.meta.get_or_insert(state.directory.create_output(&meta_name, &state.context)?);
        codec_util::write_index_header(&mut **meta, META_CODEC, VERSION_CURRENT, id, &state.segment_suffix)?;

        Ok(())
    }

    pub fn settings(&self) -> &DocValuesSettings {
        &self.settings
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    fn check_field(&self, field: &FieldInfo, doc_values_type: DocValuesType) -> Result<()> {
        if self.aborted {
            return Err(DocValuesError::Aborted);
        }

        if self.data.is_none() || self.meta.is_none() {
            return Err(DocValuesError::Closed);
        }

        if field.doc_values_type != doc_values_type {
            return Err(DocValuesError::UnexpectedType {
                field: field.name.clone(),
                expected: doc_values_type,
                actual: field.doc_values_type,
            });
        }

        if self.written_fields.contains(&field.number()) {
            return Err(DocValuesError::DuplicateField {
                field: field.name.clone(),
                number: field.number(),
            });
        }

        Ok(())
    }

    /// Writes the field's number and type tag, then runs `encode` to write
    /// its entry and payload
    ///
    /// Once anything has been written, any failure aborts the consumer.
    fn write_field<F>(&mut self, field: &FieldInfo, doc_values_type: DocValuesType, encode: F) -> Result<()>
        where F: FnOnce(&mut dyn IndexOutput, &mut dyn IndexOutput, &DocValuesSettings) -> Result<()>
    {
        self.check_field(field, doc_values_type)?;
        self.written_fields.insert(field.number());

        let encoding = FieldEncoding::for_doc_values_type(doc_values_type);
        trace!("adding {} field {} (number {})", doc_values_type, field.name, field.number());

        let settings = &self.settings;
        let result = match (self.data.as_mut(), self.meta.as_mut()) {
            (Some(data), Some(meta)) => {
                start_field(&mut **meta, field.number(), encoding)
                    .map_err(DocValuesError::from)
                    .and_then(|()| encode(&mut **data, &mut **meta, settings))
            }
            _ => Err(DocValuesError::Closed),
        };

        if let Err(ref e) = result {
            debug!("aborting doc values consumer after error in field {}: {}", field.name, e);
            self.aborted = true;
        }

        result
    }

    /// Adds a numeric field, one optional value per document
    pub fn add_numeric_field<S>(&mut self, field: &FieldInfo, values: &S) -> Result<()>
        where S: ValueSource + ?Sized,
              S::Item: Into<Option<i64>>
    {
        self.write_field(field, DocValuesType::Numeric, |data, meta, settings| {
            write_numeric(data, meta, &field.name, values, settings)
        })
    }

    /// Adds a binary field, one optional value per document
    pub fn add_binary_field<S, B>(&mut self, field: &FieldInfo, values: &S) -> Result<()>
        where S: ValueSource<Item = Option<B>> + ?Sized,
              B: AsRef<[u8]>
    {
        self.write_field(field, DocValuesType::Binary, |data, meta, settings| {
            write_binary(data, meta, &field.name, values, settings)
        })
    }

    /// Adds a sorted field
    ///
    /// `values` is the dictionary of distinct values in ord order and
    /// `doc_to_ord` gives each document's ord, or -1 if it has no value.
    pub fn add_sorted_field<V, O>(&mut self, field: &FieldInfo, values: &V, doc_to_ord: &O) -> Result<()>
        where V: ValueSource + ?Sized,
              V::Item: AsRef<[u8]>,
              O: ValueSource + ?Sized,
              O::Item: Into<Option<i64>>
    {
        self.write_field(field, DocValuesType::Sorted, |data, meta, settings| {
            write_numeric(data, meta, &field.name, doc_to_ord, settings)?;
            write_binary(data, meta, &field.name, &|| values.values().map(Some), settings)
        })
    }

    /// Adds a sorted set field
    ///
    /// `doc_to_ord_count` gives the number of ords each document has, and
    /// `ords` all of their ords, document by document.
    pub fn add_sorted_set_field<V, C, O>(&mut self, field: &FieldInfo, values: &V, doc_to_ord_count: &C, ords: &O) -> Result<()>
        where V: ValueSource + ?Sized,
              V::Item: AsRef<[u8]>,
              C: ValueSource + ?Sized,
              C::Item: Into<i64>,
              O: ValueSource + ?Sized,
              O::Item: Into<Option<i64>>
    {
        self.write_field(field, DocValuesType::SortedSet, |data, meta, settings| {
            write_numeric(data, meta, &field.name, &|| CountToAddress::new(doc_to_ord_count.values()), settings)?;
            write_numeric(data, meta, &field.name, ords, settings)?;
            write_binary(data, meta, &field.name, &|| values.values().map(Some), settings)
        })
    }

    /// Adds a sorted numeric field
    ///
    /// `doc_to_value_count` gives the number of values each document has,
    /// and `values` all of the values, document by document.
    pub fn add_sorted_numeric_field<C, S>(&mut self, field: &FieldInfo, doc_to_value_count: &C, values: &S) -> Result<()>
        where C: ValueSource + ?Sized,
              C::Item: Into<i64>,
              S: ValueSource + ?Sized,
              S::Item: Into<Option<i64>>
    {
        self.write_field(field, DocValuesType::SortedNumeric, |data, meta, settings| {
            write_numeric(data, meta, &field.name, &|| CountToAddress::new(doc_to_value_count.values()), settings)?;
            write_numeric(data, meta, &field.name, values, settings)
        })
    }

    /// Finishes both files and closes them
    ///
    /// Calling this again is a no-op. An aborted consumer releases its files
    /// without finishing them.
    pub fn close(&mut self) -> Result<()> {
        let mut data = self.data.take();
        let mut meta = self.meta.take();

        if data.is_none() && meta.is_none() {
            return Ok(());
        }

        if self.aborted {
            debug!("releasing aborted doc values files without footers");
            io_utils::close_while_handling_error(vec![meta, data]);
            return Ok(());
        }

        let result = match (data.as_mut(), meta.as_mut()) {
            (Some(data), Some(meta)) => finish(&mut **data, &mut **meta),
            _ => Ok(()),
        };

        match result {
            Ok(()) => {
                io_utils::close(vec![meta, data])?;
                debug!("finished writing {} doc values fields", self.written_fields.len());
                Ok(())
            }
            Err(e) => {
                io_utils::close_while_handling_error(vec![meta, data]);
                Err(e.into())
            }
        }
    }
}


impl Drop for DocValuesConsumer {
    fn drop(&mut self) {
        if self.data.is_some() || self.meta.is_some() {
            warn!("doc values consumer dropped without being closed, releasing files without footers");
            io_utils::close_while_handling_error(vec![self.meta.take(), self.data.take()]);
        }
    }
}


fn start_field<M: DataOutput + ?Sized>(meta: &mut M, number: u32, encoding: FieldEncoding) -> io::Result<()> {
    meta.write_vint(number as i32)?;
    meta.write_byte(encoding.tag())
}


fn finish(data: &mut dyn IndexOutput, meta: &mut dyn IndexOutput) -> io::Result<()> {
    meta.write_vint(END_OF_FIELDS)?;
    codec_util::write_footer(meta)?;
    codec_util::write_footer(data)
}


#[cfg(test)]
mod tests {
    use kite::{DocValuesType, FieldInfos, SegmentInfo, SegmentWriteState};
    use kite::store::memory::RAMDirectory;

    use errors::DocValuesError;
    use settings::DocValuesSettings;
    use super::DocValuesConsumer;

    fn field_infos() -> FieldInfos {
        let mut field_infos = FieldInfos::new();
        field_infos.add_field("price".to_string(), DocValuesType::Numeric).unwrap();
        field_infos.add_field("title".to_string(), DocValuesType::Binary).unwrap();
        field_infos
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = RAMDirectory::new();
        let segment = SegmentInfo::with_random_id("_0".to_string(), 2);
        let field_infos = field_infos();
        let state = SegmentWriteState::new(&dir, &segment, &field_infos);

        let mut consumer = DocValuesConsumer::new(&state, DocValuesSettings::default()).unwrap();
        consumer.close().unwrap();

        let length = dir.read_file("_0.dvdm").unwrap().len();
        consumer.close().unwrap();
        assert_eq!(dir.read_file("_0.dvdm").unwrap().len(), length);
    }

    #[test]
    fn test_add_after_close() {
        let dir = RAMDirectory::new();
        let segment = SegmentInfo::with_random_id("_0".to_string(), 2);
        let field_infos = field_infos();
        let state = SegmentWriteState::new(&dir, &segment, &field_infos);
        let price = field_infos.get_field_by_name("price").unwrap();

        let mut consumer = DocValuesConsumer::new(&state, DocValuesSettings::default()).unwrap();
        consumer.close().unwrap();

        match consumer.add_numeric_field(price, &|| vec![1i64, 2].into_iter()) {
            Err(DocValuesError::Closed) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overflow_aborts_consumer() {
        let dir = RAMDirectory::new();
        let segment = SegmentInfo::with_random_id("_0".to_string(), 3);
        let field_infos = field_infos();
        let state = SegmentWriteState::new(&dir, &segment, &field_infos);
        let price = field_infos.get_field_by_name("price").unwrap();
        let title = field_infos.get_field_by_name("title").unwrap();

        let mut consumer = DocValuesConsumer::new(&state, DocValuesSettings::with_limits(2, 100)).unwrap();
        assert!(!consumer.is_aborted());

        match consumer.add_numeric_field(price, &|| vec![1i64, 2, 3].into_iter()) {
            Err(DocValuesError::Overflow(ref e)) => assert_eq!(e.field, "price"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(consumer.is_aborted());

        match consumer.add_binary_field(title, &|| vec![Some("a"), None, Some("b")].into_iter()) {
            Err(DocValuesError::Aborted) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        consumer.close().unwrap();
    }

    #[test]
    fn test_rejections_leave_consumer_usable() {
        let dir = RAMDirectory::new();
        let segment = SegmentInfo::with_random_id("_0".to_string(), 2);
        let field_infos = field_infos();
        let state = SegmentWriteState::new(&dir, &segment, &field_infos);
        let price = field_infos.get_field_by_name("price").unwrap();
        let title = field_infos.get_field_by_name("title").unwrap();

        let mut consumer = DocValuesConsumer::new(&state, DocValuesSettings::default()).unwrap();

        match consumer.add_numeric_field(title, &|| vec![1i64, 2].into_iter()) {
            Err(DocValuesError::UnexpectedType { expected: DocValuesType::Numeric, actual: DocValuesType::Binary, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        consumer.add_numeric_field(price, &|| vec![1i64, 2].into_iter()).unwrap();

        match consumer.add_numeric_field(price, &|| vec![3i64, 4].into_iter()) {
            Err(DocValuesError::DuplicateField { number, .. }) => assert_eq!(number, price.number()),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(!consumer.is_aborted());
        consumer.add_binary_field(title, &|| vec![Some("a"), Some("b")].into_iter()).unwrap();
        consumer.close().unwrap();
    }

    #[test]
    fn test_drop_without_close_releases_files() {
        let dir = RAMDirectory::new();
        let segment = SegmentInfo::with_random_id("_0".to_string(), 2);
        let field_infos = field_infos();
        let state = SegmentWriteState::new(&dir, &segment, &field_infos);

        {
            let _consumer = DocValuesConsumer::new(&state, DocValuesSettings::default()).unwrap();
        }

        // Released with only their headers
        assert!(dir.file_exists("_0.dvdd"));
        assert!(dir.file_exists("_0.dvdm"));
        let header_length = ::kite::codec_util::index_header_length(::format::META_CODEC, "");
        assert_eq!(dir.read_file("_0.dvdm").unwrap().len() as u64, header_length);
    }
}
