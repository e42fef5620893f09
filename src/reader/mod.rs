pub mod entry;
pub mod doc_values;

use std::collections::HashMap;

use roaring::RoaringBitmap;

use kite::{CodecError, DocValuesType, FieldInfo, FieldInfos, SegmentReadState};
use kite::codec_util;
use kite::segment::segment_file_name;
use kite::store::{DataInput, IndexInput};

use errors::{DocValuesError, Result};
use format::{FieldEncoding, DATA_CODEC, DATA_EXTENSION, META_CODEC, META_EXTENSION, VERSION_START, VERSION_CURRENT, END_OF_FIELDS};
use reader::entry::{FieldEntry, read_field_entry};
use reader::doc_values::{NumericDocValues, BinaryDocValues, SortedDocValues, SortedSetDocValues, SortedNumericDocValues, load_bits, docs_with_value};


/// Reads the doc values of one segment
///
/// All of the metadata is read and verified up front. Values are loaded from
/// the data file each time they're requested.
pub struct DocValuesProducer {
    data: Box<dyn IndexInput>,
    entries: HashMap<u32, FieldEntry>,
    version: i32,
}


impl DocValuesProducer {
    pub fn open(state: &SegmentReadState) -> Result<DocValuesProducer> {
        let id = state.segment_info.id();

        let meta_name = segment_file_name(&state.segment_info.name, &state.segment_suffix, META_EXTENSION);
        let mut meta = state.directory.open_input(&meta_name, &state.context)?;
        let version = codec_util::check_index_header(&mut *meta, META_CODEC, VERSION_START, VERSION_CURRENT, id, &state.segment_suffix)?;
        let entries = read_fields(&mut *meta, state.field_infos)?;
        codec_util::check_footer(&mut *meta)?;

        let data_name = segment_file_name(&state.segment_info.name, &state.segment_suffix, DATA_EXTENSION);
        let mut data = state.directory.open_input(&data_name, &state.context)?;
        let data_version = codec_util::check_index_header(&mut *data, DATA_CODEC, VERSION_START, VERSION_CURRENT, id, &state.segment_suffix)?;
        if data_version != version {
            return Err(CodecError::corrupt(data.name(), format!("format versions mismatch: meta={}, data={}", version, data_version)).into());
        }

        // Only the footer's structure is checked here, verifying the whole
        // file is left to check_integrity
        codec_util::retrieve_checksum(&mut *data)?;

        debug!("opened doc values for segment {}: {} fields", state.segment_info.name, entries.len());

        Ok(DocValuesProducer {
            data: data,
            entries: entries,
            version: version,
        })
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// The entry describing where a field's values are stored
    pub fn entry(&self, field: &FieldInfo) -> Option<&FieldEntry> {
        self.entries.get(&field.number())
    }

    fn get_entry(&self, field: &FieldInfo) -> Result<&FieldEntry> {
        match self.entries.get(&field.number()) {
            Some(entry) => Ok(entry),
            None => Err(DocValuesError::UnknownField(field.name.clone())),
        }
    }

    pub fn get_numeric(&self, field: &FieldInfo) -> Result<NumericDocValues> {
        let mut data = self.data.clone_input();

        match *self.get_entry(field)? {
            FieldEntry::Numeric(ref entry) => Ok(NumericDocValues::load(&mut *data, entry)?),
            ref other => Err(unexpected_type(field, DocValuesType::Numeric, other)),
        }
    }

    pub fn get_binary(&self, field: &FieldInfo) -> Result<BinaryDocValues> {
        let mut data = self.data.clone_input();

        match *self.get_entry(field)? {
            FieldEntry::Binary(ref entry) => Ok(BinaryDocValues::load(&mut *data, entry)?),
            ref other => Err(unexpected_type(field, DocValuesType::Binary, other)),
        }
    }

    pub fn get_sorted(&self, field: &FieldInfo) -> Result<SortedDocValues> {
        let mut data = self.data.clone_input();

        match *self.get_entry(field)? {
            FieldEntry::Sorted(ref entry) => {
                let doc_to_ord = NumericDocValues::load(&mut *data, &entry.doc_to_ord)?;
                let values = BinaryDocValues::load(&mut *data, &entry.values)?;
                Ok(SortedDocValues::new(doc_to_ord, values))
            }
            ref other => Err(unexpected_type(field, DocValuesType::Sorted, other)),
        }
    }

    pub fn get_sorted_set(&self, field: &FieldInfo) -> Result<SortedSetDocValues> {
        let mut data = self.data.clone_input();

        match *self.get_entry(field)? {
            FieldEntry::SortedSet(ref entry) => {
                let addresses = NumericDocValues::load(&mut *data, &entry.doc_to_ord_address)?;
                let ords = NumericDocValues::load(&mut *data, &entry.ords)?;
                let values = BinaryDocValues::load(&mut *data, &entry.values)?;
                Ok(SortedSetDocValues::new(addresses, ords, values))
            }
            ref other => Err(unexpected_type(field, DocValuesType::SortedSet, other)),
        }
    }

    pub fn get_sorted_numeric(&self, field: &FieldInfo) -> Result<SortedNumericDocValues> {
        let mut data = self.data.clone_input();

        match *self.get_entry(field)? {
            FieldEntry::SortedNumeric(ref entry) => {
                let addresses = NumericDocValues::load(&mut *data, &entry.doc_to_address)?;
                let values = NumericDocValues::load(&mut *data, &entry.values)?;
                Ok(SortedNumericDocValues::new(addresses, values))
            }
            ref other => Err(unexpected_type(field, DocValuesType::SortedNumeric, other)),
        }
    }

    /// Documents that have at least one value for the field
    pub fn get_docs_with_field(&self, field: &FieldInfo) -> Result<RoaringBitmap> {
        let mut data = self.data.clone_input();

        Ok(match *self.get_entry(field)? {
            FieldEntry::Numeric(ref entry) => {
                let bits = load_bits(&mut *data, entry.missing_offset, entry.missing_bytes, entry.count)?;
                docs_with_value(bits.as_ref(), entry.count)
            }
            FieldEntry::Binary(ref entry) => {
                let bits = load_bits(&mut *data, entry.missing_offset, entry.missing_bytes, entry.count)?;
                docs_with_value(bits.as_ref(), entry.count)
            }
            FieldEntry::Sorted(_) => self.get_sorted(field)?.docs_with_field(),
            FieldEntry::SortedSet(_) => self.get_sorted_set(field)?.docs_with_field(),
            FieldEntry::SortedNumeric(_) => self.get_sorted_numeric(field)?.docs_with_field(),
        })
    }

    /// Verifies the checksum of the entire data file
    pub fn check_integrity(&self) -> Result<()> {
        let mut data = self.data.clone_input();
        codec_util::checksum_entire_file(&mut *data)?;
        Ok(())
    }
}


fn unexpected_type(field: &FieldInfo, expected: DocValuesType, entry: &FieldEntry) -> DocValuesError {
    DocValuesError::UnexpectedType {
        field: field.name.clone(),
        expected: expected,
        actual: entry.doc_values_type(),
    }
}


fn read_fields<I: IndexInput + ?Sized>(meta: &mut I, field_infos: &FieldInfos) -> Result<HashMap<u32, FieldEntry>> {
    let mut entries = HashMap::new();

    loop {
        let number = meta.read_vint()?;
        if number == END_OF_FIELDS {
            break;
        }

        let field = match field_infos.get_field_by_number(number as u32) {
            Some(field) if number >= 0 => field,
            _ => return Err(CodecError::corrupt(meta.name(), format!("invalid field number: {}", number)).into()),
        };

        let tag = meta.read_byte()?;
        let encoding = match FieldEncoding::from_tag(tag) {
            Some(encoding) => encoding,
            None => return Err(CodecError::corrupt(meta.name(), format!("invalid entry type: {}, field: {}", tag, field.name)).into()),
        };

        if encoding.doc_values_type() != field.doc_values_type {
            return Err(CodecError::corrupt(meta.name(), format!("field {} has doc values type {}, but was written as {}", field.name, field.doc_values_type, encoding.doc_values_type())).into());
        }

        let entry = read_field_entry(meta, encoding)?;
        trace!("read {} entry for field {}", encoding.doc_values_type(), field.name);

        if entries.insert(number as u32, entry).is_some() {
            return Err(CodecError::corrupt(meta.name(), format!("duplicate field: {}", field.name)).into());
        }
    }

    Ok(entries)
}
