//! Doc values loaded into memory

use byteorder::{BigEndian, ReadBytesExt};
use roaring::RoaringBitmap;

use kite::CodecError;
use kite::store::{DataInput, IndexInput};

use reader::entry::{NumericEntry, BinaryEntry};
use writer::bitset::num_words;


/// One bit per document, set if the document has a value
#[derive(Debug, Clone, PartialEq)]
pub struct Bits {
    words: Vec<u64>,
    len: u32,
}


impl Bits {
    #[inline]
    pub fn get(&self, index: u32) -> bool {
        assert!(index < self.len, "bit index out of bounds: {} >= {}", index, self.len);
        (self.words[(index / 64) as usize] >> (index % 64)) & 1 != 0
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_bitmap(&self) -> RoaringBitmap {
        (0..self.len).filter(|&index| self.get(index)).collect()
    }
}


/// Loads a missing bitset, if the column has one
pub fn load_bits<I>(data: &mut I, missing_offset: Option<u64>, missing_bytes: u64, len: u32) -> Result<Option<Bits>, CodecError>
    where I: IndexInput + ?Sized
{
    let offset = match missing_offset {
        Some(offset) => offset,
        None => return Ok(None),
    };

    let num_words = num_words(len as u64);
    if missing_bytes != num_words * 8 {
        return Err(CodecError::corrupt(data.name(), format!("missing bitset is {} bytes, expected {} for {} values", missing_bytes, num_words * 8, len)));
    }

    data.seek(offset)?;
    let mut words = vec![0; num_words as usize];
    data.read_u64_into::<BigEndian>(&mut words)?;

    Ok(Some(Bits {
        words: words,
        len: len,
    }))
}


fn all_docs(len: u32) -> RoaringBitmap {
    let mut bitmap = RoaringBitmap::new();
    bitmap.insert_range(0..len);
    bitmap
}


/// Documents that have a value in a column with an optional missing bitset
pub fn docs_with_value(bits: Option<&Bits>, len: u32) -> RoaringBitmap {
    match bits {
        Some(bits) => bits.to_bitmap(),
        None => all_docs(len),
    }
}


#[derive(Debug, Clone, PartialEq)]
enum NumericArray {
    Bytes(Vec<i8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
}


impl NumericArray {
    fn read<I: IndexInput + ?Sized>(data: &mut I, byte_width: u8, count: usize) -> Result<NumericArray, CodecError> {
        Ok(match byte_width {
            1 => {
                let mut values = vec![0; count];
                data.read_i8_into(&mut values)?;
                NumericArray::Bytes(values)
            }
            2 => {
                let mut values = vec![0; count];
                data.read_i16_into::<BigEndian>(&mut values)?;
                NumericArray::Shorts(values)
            }
            4 => {
                let mut values = vec![0; count];
                data.read_i32_into::<BigEndian>(&mut values)?;
                NumericArray::Ints(values)
            }
            8 => {
                let mut values = vec![0; count];
                data.read_i64_into::<BigEndian>(&mut values)?;
                NumericArray::Longs(values)
            }
            _ => return Err(CodecError::corrupt(data.name(), format!("invalid byte width: {}", byte_width))),
        })
    }

    #[inline]
    fn get(&self, index: usize) -> i64 {
        match *self {
            NumericArray::Bytes(ref values) => values[index] as i64,
            NumericArray::Shorts(ref values) => values[index] as i64,
            NumericArray::Ints(ref values) => values[index] as i64,
            NumericArray::Longs(ref values) => values[index],
        }
    }

    fn len(&self) -> usize {
        match *self {
            NumericArray::Bytes(ref values) => values.len(),
            NumericArray::Shorts(ref values) => values.len(),
            NumericArray::Ints(ref values) => values.len(),
            NumericArray::Longs(ref values) => values.len(),
        }
    }
}


/// A numeric column
///
/// Documents without a value read as 0; use `has_value` to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericDocValues {
    values: NumericArray,
    docs_with_field: Option<Bits>,
}


impl NumericDocValues {
    pub fn load<I: IndexInput + ?Sized>(data: &mut I, entry: &NumericEntry) -> Result<NumericDocValues, CodecError> {
        let docs_with_field = load_bits(data, entry.missing_offset, entry.missing_bytes, entry.count)?;

        data.seek(entry.values_offset())?;
        let values = NumericArray::read(data, entry.byte_width, entry.count as usize)?;

        Ok(NumericDocValues {
            values: values,
            docs_with_field: docs_with_field,
        })
    }

    #[inline]
    pub fn get(&self, doc: u32) -> i64 {
        self.values.get(doc as usize)
    }

    pub fn has_value(&self, doc: u32) -> bool {
        match self.docs_with_field {
            Some(ref bits) => bits.get(doc),
            None => (doc as usize) < self.values.len(),
        }
    }

    /// Returns `None` for documents without a value
    pub fn value(&self, doc: u32) -> Option<i64> {
        if self.has_value(doc) {
            Some(self.get(doc))
        } else {
            None
        }
    }

    pub fn len(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    pub fn docs_with_field(&self) -> RoaringBitmap {
        docs_with_value(self.docs_with_field.as_ref(), self.len())
    }
}


/// A binary column
///
/// Documents without a value read as an empty slice; use `has_value` to tell
/// them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryDocValues {
    bytes: Vec<u8>,
    addresses: Vec<i32>,
    docs_with_field: Option<Bits>,
}


impl BinaryDocValues {
    pub fn load<I: IndexInput + ?Sized>(data: &mut I, entry: &BinaryEntry) -> Result<BinaryDocValues, CodecError> {
        let docs_with_field = load_bits(data, entry.missing_offset, entry.missing_bytes, entry.count)?;

        data.seek(entry.offset)?;
        let mut bytes = vec![0; entry.num_bytes as usize];
        data.read_bytes(&mut bytes)?;

        data.seek(entry.addresses_offset())?;
        let mut addresses = vec![0; entry.count as usize + 1];
        data.read_i32_into::<BigEndian>(&mut addresses)?;

        if addresses[0] != 0 || addresses[addresses.len() - 1] as u32 != entry.num_bytes {
            return Err(CodecError::corrupt(data.name(), format!("address table does not span the {} byte payload", entry.num_bytes)));
        }

        if addresses.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(CodecError::corrupt(data.name(), "address table is not in order"));
        }

        Ok(BinaryDocValues {
            bytes: bytes,
            addresses: addresses,
            docs_with_field: docs_with_field,
        })
    }

    #[inline]
    pub fn get(&self, doc: u32) -> &[u8] {
        let doc = doc as usize;
        &self.bytes[self.addresses[doc] as usize..self.addresses[doc + 1] as usize]
    }

    pub fn has_value(&self, doc: u32) -> bool {
        match self.docs_with_field {
            Some(ref bits) => bits.get(doc),
            None => doc < self.len(),
        }
    }

    /// Returns `None` for documents without a value
    pub fn value(&self, doc: u32) -> Option<&[u8]> {
        if self.has_value(doc) {
            Some(self.get(doc))
        } else {
            None
        }
    }

    pub fn len(&self) -> u32 {
        (self.addresses.len() - 1) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn docs_with_field(&self) -> RoaringBitmap {
        docs_with_value(self.docs_with_field.as_ref(), self.len())
    }
}


/// A single valued column of dictionary values
#[derive(Debug, Clone, PartialEq)]
pub struct SortedDocValues {
    doc_to_ord: NumericDocValues,
    values: BinaryDocValues,
}


impl SortedDocValues {
    pub fn new(doc_to_ord: NumericDocValues, values: BinaryDocValues) -> SortedDocValues {
        SortedDocValues {
            doc_to_ord: doc_to_ord,
            values: values,
        }
    }

    /// The document's ord, or -1 if it has no value
    pub fn ord(&self, doc: u32) -> i64 {
        match self.doc_to_ord.value(doc) {
            Some(ord) => ord,
            None => -1,
        }
    }

    pub fn lookup_ord(&self, ord: u32) -> &[u8] {
        self.values.get(ord)
    }

    pub fn get(&self, doc: u32) -> Option<&[u8]> {
        let ord = self.ord(doc);
        if ord < 0 {
            None
        } else {
            Some(self.lookup_ord(ord as u32))
        }
    }

    pub fn value_count(&self) -> u32 {
        self.values.len()
    }

    pub fn len(&self) -> u32 {
        self.doc_to_ord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_to_ord.is_empty()
    }

    pub fn docs_with_field(&self) -> RoaringBitmap {
        (0..self.len()).filter(|&doc| self.ord(doc) >= 0).collect()
    }
}


/// Per-document ranges into a flattened column, decoded from `n + 1`
/// addresses
fn address_range(addresses: &NumericDocValues, doc: u32) -> (u32, u32) {
    (addresses.get(doc) as u32, addresses.get(doc + 1) as u32)
}


fn docs_with_addresses(addresses: &NumericDocValues) -> RoaringBitmap {
    let num_docs = addresses.len().saturating_sub(1);
    (0..num_docs)
        .filter(|&doc| {
            let (start, end) = address_range(addresses, doc);
            end > start
        })
        .collect()
}


/// A multi valued column of dictionary values
#[derive(Debug, Clone, PartialEq)]
pub struct SortedSetDocValues {
    addresses: NumericDocValues,
    ords: NumericDocValues,
    values: BinaryDocValues,
}


impl SortedSetDocValues {
    pub fn new(addresses: NumericDocValues, ords: NumericDocValues, values: BinaryDocValues) -> SortedSetDocValues {
        SortedSetDocValues {
            addresses: addresses,
            ords: ords,
            values: values,
        }
    }

    /// The document's ords, in the order they were written
    pub fn ords<'a>(&'a self, doc: u32) -> impl Iterator<Item = i64> + 'a {
        let (start, end) = address_range(&self.addresses, doc);
        (start..end).map(move |index| self.ords.get(index))
    }

    pub fn lookup_ord(&self, ord: u32) -> &[u8] {
        self.values.get(ord)
    }

    pub fn value_count(&self) -> u32 {
        self.values.len()
    }

    pub fn len(&self) -> u32 {
        self.addresses.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn docs_with_field(&self) -> RoaringBitmap {
        docs_with_addresses(&self.addresses)
    }
}


/// A multi valued numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct SortedNumericDocValues {
    addresses: NumericDocValues,
    values: NumericDocValues,
}


impl SortedNumericDocValues {
    pub fn new(addresses: NumericDocValues, values: NumericDocValues) -> SortedNumericDocValues {
        SortedNumericDocValues {
            addresses: addresses,
            values: values,
        }
    }

    pub fn values<'a>(&'a self, doc: u32) -> impl Iterator<Item = i64> + 'a {
        let (start, end) = address_range(&self.addresses, doc);
        (start..end).map(move |index| self.values.get(index))
    }

    pub fn count(&self, doc: u32) -> u32 {
        let (start, end) = address_range(&self.addresses, doc);
        end - start
    }

    pub fn len(&self) -> u32 {
        self.addresses.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn docs_with_field(&self) -> RoaringBitmap {
        docs_with_addresses(&self.addresses)
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kite::store::DataOutput;
    use kite::store::memory::ByteArrayInput;

    use reader::entry::{NumericEntry, BinaryEntry};
    use super::{NumericDocValues, BinaryDocValues, load_bits};

    fn input(buf: Vec<u8>) -> ByteArrayInput {
        ByteArrayInput::new("data".to_string(), Arc::new(buf))
    }

    #[test]
    fn test_load_shorts_with_missing() {
        let mut buf = Vec::new();
        buf.write_long(0b1011).unwrap();
        for value in &[-300i16, 7, 0, 12] {
            buf.write_short(*value).unwrap();
        }

        let entry = NumericEntry {
            offset: 0,
            count: 4,
            missing_offset: Some(0),
            missing_bytes: 8,
            byte_width: 2,
        };

        let values = NumericDocValues::load(&mut input(buf), &entry).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values.value(0), Some(-300));
        assert_eq!(values.value(1), Some(7));
        assert_eq!(values.value(2), None);
        assert_eq!(values.get(2), 0);
        assert_eq!(values.value(3), Some(12));
        assert_eq!(values.docs_with_field().iter().collect::<Vec<u32>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_wrong_bitset_length() {
        let mut data = input(vec![0; 16]);

        assert!(load_bits(&mut data, Some(0), 16, 64).is_err());
        assert!(load_bits(&mut data, Some(0), 8, 64).unwrap().is_some());
        assert!(load_bits(&mut data, None, 0, 64).unwrap().is_none());
    }

    #[test]
    fn test_load_binary() {
        let mut buf = b"foobar".to_vec();
        for address in &[0, 3, 3, 6] {
            buf.write_int(*address).unwrap();
        }

        let entry = BinaryEntry {
            offset: 0,
            num_bytes: 6,
            count: 3,
            missing_offset: None,
            missing_bytes: 0,
        };

        let values = BinaryDocValues::load(&mut input(buf), &entry).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values.get(0), b"foo");
        assert_eq!(values.get(1), b"");
        assert_eq!(values.value(1), Some(&b""[..]));
        assert_eq!(values.get(2), b"bar");
    }

    #[test]
    fn test_addresses_out_of_order() {
        let mut buf = b"foobar".to_vec();
        for address in &[0, 4, 3, 6] {
            buf.write_int(*address).unwrap();
        }

        let entry = BinaryEntry {
            offset: 0,
            num_bytes: 6,
            count: 3,
            missing_offset: None,
            missing_bytes: 0,
        };

        assert!(BinaryDocValues::load(&mut input(buf), &entry).is_err());
    }
}
