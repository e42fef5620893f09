use kite::{CodecError, DocValuesType};
use kite::store::{DataInput, IndexInput};

use format::FieldEncoding;


/// Where a numeric column lives in the data file
#[derive(Debug, Clone, PartialEq)]
pub struct NumericEntry {
    pub offset: u64,
    pub count: u32,
    pub missing_offset: Option<u64>,
    pub missing_bytes: u64,
    pub byte_width: u8,
}


impl NumericEntry {
    /// Position of the first value, after the missing bitset
    pub fn values_offset(&self) -> u64 {
        self.offset + self.missing_bytes
    }
}


/// Where a binary column lives in the data file
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryEntry {
    pub offset: u64,
    pub num_bytes: u32,
    pub count: u32,
    pub missing_offset: Option<u64>,
    pub missing_bytes: u64,
}


impl BinaryEntry {
    /// Position of the address table, after the payload and missing bitset
    pub fn addresses_offset(&self) -> u64 {
        self.offset + self.num_bytes as u64 + self.missing_bytes
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct SortedEntry {
    pub doc_to_ord: NumericEntry,
    pub values: BinaryEntry,
}


#[derive(Debug, Clone, PartialEq)]
pub struct SortedSetEntry {
    pub doc_to_ord_address: NumericEntry,
    pub ords: NumericEntry,
    pub values: BinaryEntry,
}


#[derive(Debug, Clone, PartialEq)]
pub struct SortedNumericEntry {
    pub doc_to_address: NumericEntry,
    pub values: NumericEntry,
}


#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    Numeric(NumericEntry),
    Binary(BinaryEntry),
    Sorted(SortedEntry),
    SortedSet(SortedSetEntry),
    SortedNumeric(SortedNumericEntry),
}


impl FieldEntry {
    pub fn doc_values_type(&self) -> DocValuesType {
        match *self {
            FieldEntry::Numeric(_) => DocValuesType::Numeric,
            FieldEntry::Binary(_) => DocValuesType::Binary,
            FieldEntry::Sorted(_) => DocValuesType::Sorted,
            FieldEntry::SortedSet(_) => DocValuesType::SortedSet,
            FieldEntry::SortedNumeric(_) => DocValuesType::SortedNumeric,
        }
    }
}


fn read_offset<I: IndexInput + ?Sized>(meta: &mut I, what: &str) -> Result<u64, CodecError> {
    let offset = meta.read_long()?;
    if offset < 0 {
        return Err(CodecError::corrupt(meta.name(), format!("invalid {}: {}", what, offset)));
    }

    Ok(offset as u64)
}


fn read_count<I: IndexInput + ?Sized>(meta: &mut I, what: &str) -> Result<u32, CodecError> {
    let count = meta.read_int()?;
    if count < 0 {
        return Err(CodecError::corrupt(meta.name(), format!("invalid {}: {}", what, count)));
    }

    Ok(count as u32)
}


fn read_missing<I: IndexInput + ?Sized>(meta: &mut I) -> Result<(Option<u64>, u64), CodecError> {
    let missing_offset = meta.read_long()?;
    if missing_offset == -1 {
        return Ok((None, 0));
    }

    if missing_offset < 0 {
        return Err(CodecError::corrupt(meta.name(), format!("invalid missing offset: {}", missing_offset)));
    }

    let missing_bytes = read_offset(meta, "missing length")?;
    Ok((Some(missing_offset as u64), missing_bytes))
}


pub fn read_numeric_entry<I: IndexInput + ?Sized>(meta: &mut I) -> Result<NumericEntry, CodecError> {
    let offset = read_offset(meta, "data offset")?;
    let count = read_count(meta, "value count")?;
    let (missing_offset, missing_bytes) = read_missing(meta)?;

    let byte_width = meta.read_byte()?;
    match byte_width {
        1 | 2 | 4 | 8 => {}
        _ => return Err(CodecError::corrupt(meta.name(), format!("invalid byte width: {}", byte_width))),
    }

    Ok(NumericEntry {
        offset: offset,
        count: count,
        missing_offset: missing_offset,
        missing_bytes: missing_bytes,
        byte_width: byte_width,
    })
}


pub fn read_binary_entry<I: IndexInput + ?Sized>(meta: &mut I) -> Result<BinaryEntry, CodecError> {
    let offset = read_offset(meta, "data offset")?;
    let num_bytes = read_count(meta, "total bytes")?;
    let count = read_count(meta, "value count")?;
    let (missing_offset, missing_bytes) = read_missing(meta)?;

    Ok(BinaryEntry {
        offset: offset,
        num_bytes: num_bytes,
        count: count,
        missing_offset: missing_offset,
        missing_bytes: missing_bytes,
    })
}


/// Reads the entry that follows a field's type tag
pub fn read_field_entry<I: IndexInput + ?Sized>(meta: &mut I, encoding: FieldEncoding) -> Result<FieldEntry, CodecError> {
    Ok(match encoding {
        FieldEncoding::Number => FieldEntry::Numeric(read_numeric_entry(meta)?),
        FieldEncoding::Bytes => FieldEntry::Binary(read_binary_entry(meta)?),
        FieldEncoding::Sorted => {
            FieldEntry::Sorted(SortedEntry {
                doc_to_ord: read_numeric_entry(meta)?,
                values: read_binary_entry(meta)?,
            })
        }
        FieldEncoding::SortedSet => {
            FieldEntry::SortedSet(SortedSetEntry {
                doc_to_ord_address: read_numeric_entry(meta)?,
                ords: read_numeric_entry(meta)?,
                values: read_binary_entry(meta)?,
            })
        }
        FieldEncoding::SortedNumeric => {
            FieldEntry::SortedNumeric(SortedNumericEntry {
                doc_to_address: read_numeric_entry(meta)?,
                values: read_numeric_entry(meta)?,
            })
        }
    })
}
