use kite::store::{DataOutput, IndexOutput};

use errors::{DocValuesError, LimitKind, Result};
use settings::{DocValuesSettings, MAX_ARRAY_LENGTH};
use values::ValueSource;
use writer::bitset::write_missing_bitset;


/// Writes a binary column to `data` and its entry to `meta`
///
/// The payload goes first, followed by the missing bitset (if any value is
/// missing) and `count + 1` addresses into the payload.
///
/// Entry: data offset (i64), total bytes (i32), count (i32), missing bitset
/// offset and length (i64 each, or a single -1 when nothing is missing).
pub fn write_binary<D, M, S, B>(data: &mut D, meta: &mut M, field: &str, values: &S, settings: &DocValuesSettings) -> Result<()>
    where D: IndexOutput + ?Sized,
          M: DataOutput + ?Sized,
          S: ValueSource<Item = Option<B>> + ?Sized,
          B: AsRef<[u8]>
{
    let start = data.file_pointer();

    let mut total_bytes: u64 = 0;
    let mut count: u64 = 0;
    let mut missing = false;

    for value in values.values() {
        match value {
            Some(bytes) => {
                let bytes = bytes.as_ref();

                total_bytes += bytes.len() as u64;
                if total_bytes > settings.max_total_bytes() {
                    return Err(DocValuesError::overflow(field, LimitKind::TotalBytes, settings.max_total_bytes()));
                }

                data.write_bytes(bytes)?;
            }
            None => {
                missing = true;
            }
        }

        count += 1;
        if count > MAX_ARRAY_LENGTH {
            return Err(DocValuesError::overflow(field, LimitKind::Values, MAX_ARRAY_LENGTH));
        }
    }

    meta.write_long(start as i64)?;
    meta.write_int(total_bytes as i32)?;
    meta.write_int(count as i32)?;

    if missing {
        let bitset_start = data.file_pointer();
        write_missing_bitset(data, values.values().map(|value| value.is_some()))?;
        meta.write_long(bitset_start as i64)?;
        meta.write_long((data.file_pointer() - bitset_start) as i64)?;
    } else {
        meta.write_long(-1)?;
    }

    trace!("writing binary field {}: count={}, total_bytes={}, missing={}", field, count, total_bytes, missing);

    let mut address: i32 = 0;
    for value in values.values() {
        data.write_int(address)?;

        if let Some(bytes) = value {
            address += bytes.as_ref().len() as i32;
        }
    }
    data.write_int(address)?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Write};

    use byteorder::{ByteOrder, BigEndian};
    use kite::store::{Directory, DataInput, IndexOutput, IOContext};
    use kite::store::memory::RAMDirectory;

    use errors::{DocValuesError, LimitKind};
    use settings::{DocValuesSettings, MAX_ARRAY_LENGTH};
    use super::write_binary;

    /// Counts bytes without keeping them
    struct NullOutput {
        written: u64,
    }

    impl Write for NullOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written += buf.len() as u64;
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl IndexOutput for NullOutput {
        fn name(&self) -> &str {
            "null"
        }

        fn file_pointer(&self) -> u64 {
            self.written
        }

        fn checksum(&self) -> u64 {
            0
        }

        fn close(self: Box<Self>) -> io::Result<()> {
            Ok(())
        }
    }

    fn encode(values: Vec<Option<&'static str>>, settings: &DocValuesSettings) -> (Vec<u8>, Vec<u8>, ::errors::Result<()>) {
        let dir = RAMDirectory::new();
        let mut data = dir.create_output("data", &IOContext::Default).unwrap();
        let mut meta = Vec::new();

        let result = write_binary(&mut *data, &mut meta, "bin", &|| values.iter().cloned(), settings);
        data.close().unwrap();

        (dir.read_file("data").unwrap(), meta, result)
    }

    fn addresses(buf: &[u8]) -> Vec<i32> {
        buf.chunks(4).map(BigEndian::read_i32).collect()
    }

    #[test]
    fn test_address_table() {
        let (data, meta, result) = encode(vec![Some("ab"), Some(""), Some("cde")], &DocValuesSettings::default());
        result.unwrap();

        let mut meta = Cursor::new(meta);
        assert_eq!(meta.read_long().unwrap(), 0);
        assert_eq!(meta.read_int().unwrap(), 5);
        assert_eq!(meta.read_int().unwrap(), 3);
        assert_eq!(meta.read_long().unwrap(), -1);

        assert_eq!(&data[..5], b"abcde");
        assert_eq!(addresses(&data[5..]), vec![0, 2, 2, 5]);
    }

    #[test]
    fn test_missing_value() {
        let (data, meta, result) = encode(vec![Some("x"), None, Some("yz")], &DocValuesSettings::default());
        result.unwrap();

        let mut meta = Cursor::new(meta);
        assert_eq!(meta.read_long().unwrap(), 0);
        assert_eq!(meta.read_int().unwrap(), 3);
        assert_eq!(meta.read_int().unwrap(), 3);
        assert_eq!(meta.read_long().unwrap(), 3);
        assert_eq!(meta.read_long().unwrap(), 8);

        assert_eq!(&data[..3], b"xyz");
        assert_eq!(BigEndian::read_u64(&data[3..11]), 0b101);
        assert_eq!(addresses(&data[11..]), vec![0, 1, 1, 3]);
    }

    #[test]
    fn test_empty() {
        let (data, meta, result) = encode(vec![], &DocValuesSettings::default());
        result.unwrap();

        let mut meta = Cursor::new(meta);
        meta.read_long().unwrap();
        assert_eq!(meta.read_int().unwrap(), 0);
        assert_eq!(meta.read_int().unwrap(), 0);
        assert_eq!(meta.read_long().unwrap(), -1);

        assert_eq!(addresses(&data), vec![0]);
    }

    #[test]
    fn test_total_bytes_limit() {
        let settings = DocValuesSettings::with_limits(100, 4);

        let (_, _, result) = encode(vec![Some("ab"), Some("cd")], &settings);
        assert!(result.is_ok());

        let (_, meta, result) = encode(vec![Some("ab"), Some("cd"), Some("e")], &settings);
        match result {
            Err(DocValuesError::Overflow(ref e)) => {
                assert_eq!(e.field, "bin");
                assert_eq!(e.kind, LimitKind::TotalBytes);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(meta.is_empty());
    }

    #[test]
    fn test_total_bytes_capped_at_array_length() {
        let settings = DocValuesSettings::with_limits(u64::max_value(), u64::max_value());
        let chunk = vec![0u8; 1 << 30];
        let mut data = NullOutput { written: 0 };
        let mut meta = Vec::new();

        let result = write_binary(&mut data, &mut meta, "blob", &|| (0..3).map(|_| Some(&chunk[..])), &settings);
        match result {
            Err(DocValuesError::Overflow(ref e)) => {
                assert_eq!(e.field, "blob");
                assert_eq!(e.kind, LimitKind::TotalBytes);
                assert_eq!(e.limit, MAX_ARRAY_LENGTH);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(data.written, 1 << 30);
        assert!(meta.is_empty());
    }
}
