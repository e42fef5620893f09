//! Headers and footers shared by every file a codec writes
//!
//! Header:       magic (i32), codec name (string), version (i32)
//! Index header: header, segment id (16 bytes), suffix length (u8), suffix
//! Footer:       !magic (i32), algorithm id (i32, always 0), CRC32 (i64)

use std::io;

use crc32fast::Hasher;

use errors::CodecError;
use segment::ID_LENGTH;
use store::{DataOutput, DataInput, IndexOutput, IndexInput};


pub const CODEC_MAGIC: i32 = 0x3fd76c17;
pub const FOOTER_MAGIC: i32 = !CODEC_MAGIC;
pub const FOOTER_LENGTH: u64 = 16;


fn invalid_input(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}


fn check_ascii(value: &str, max_len: usize, what: &str) -> io::Result<()> {
    if !value.is_ascii() || value.len() > max_len {
        return Err(invalid_input(format!("{} must be simple ASCII, less than {} characters in length: {}", what, max_len + 1, value)));
    }

    Ok(())
}


fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}


pub fn header_length(codec: &str) -> u64 {
    9 + codec.len() as u64
}


pub fn index_header_length(codec: &str, suffix: &str) -> u64 {
    header_length(codec) + ID_LENGTH as u64 + 1 + suffix.len() as u64
}


pub fn write_header<O: DataOutput + ?Sized>(output: &mut O, codec: &str, version: i32) -> io::Result<()> {
    check_ascii(codec, 127, "codec")?;

    output.write_int(CODEC_MAGIC)?;
    output.write_string(codec)?;
    output.write_int(version)
}


pub fn write_index_header<O: DataOutput + ?Sized>(output: &mut O, codec: &str, version: i32, id: &[u8; ID_LENGTH], suffix: &str) -> io::Result<()> {
    check_ascii(suffix, 255, "suffix")?;

    write_header(output, codec, version)?;
    output.write_bytes(id)?;
    output.write_byte(suffix.len() as u8)?;
    output.write_bytes(suffix.as_bytes())
}


/// Appends the footer. Must be the last thing written to the output
pub fn write_footer<O: IndexOutput + ?Sized>(output: &mut O) -> io::Result<()> {
    output.write_int(FOOTER_MAGIC)?;
    output.write_int(0)?;

    // The checksum covers the magic and algorithm id too
    let checksum = output.checksum();
    output.write_long(checksum as i64)
}


/// Reads and validates a header, returning its version
pub fn check_header<I: IndexInput + ?Sized>(input: &mut I, codec: &str, min_version: i32, max_version: i32) -> Result<i32, CodecError> {
    let magic = input.read_int()?;
    if magic != CODEC_MAGIC {
        return Err(CodecError::corrupt(input.name(), format!("codec header mismatch: actual header={} vs expected header={}", magic, CODEC_MAGIC)));
    }

    check_header_no_magic(input, codec, min_version, max_version)
}


fn check_header_no_magic<I: IndexInput + ?Sized>(input: &mut I, codec: &str, min_version: i32, max_version: i32) -> Result<i32, CodecError> {
    let actual_codec = input.read_string()?;
    if actual_codec != codec {
        return Err(CodecError::corrupt(input.name(), format!("codec mismatch: actual codec={} vs expected codec={}", actual_codec, codec)));
    }

    let version = input.read_int()?;
    if version < min_version {
        return Err(CodecError::IndexFormatTooOld {
            resource: input.name().to_string(),
            version: version,
            min: min_version,
        });
    }

    if version > max_version {
        return Err(CodecError::IndexFormatTooNew {
            resource: input.name().to_string(),
            version: version,
            max: max_version,
        });
    }

    Ok(version)
}


/// Reads and validates an index header, returning its version
pub fn check_index_header<I: IndexInput + ?Sized>(input: &mut I, codec: &str, min_version: i32, max_version: i32, expected_id: &[u8; ID_LENGTH], expected_suffix: &str) -> Result<i32, CodecError> {
    let version = check_header(input, codec, min_version, max_version)?;

    let mut id = [0; ID_LENGTH];
    input.read_bytes(&mut id)?;
    if &id != expected_id {
        return Err(CodecError::corrupt(input.name(), format!("file mismatch, expected id={}, got={}", hex(expected_id), hex(&id))));
    }

    let suffix_length = input.read_byte()? as usize;
    let mut suffix = vec![0; suffix_length];
    input.read_bytes(&mut suffix)?;
    if suffix != expected_suffix.as_bytes() {
        return Err(CodecError::corrupt(input.name(), format!("file mismatch, expected suffix={}, got={}", expected_suffix, String::from_utf8_lossy(&suffix))));
    }

    Ok(version)
}


fn validate_footer<I: IndexInput + ?Sized>(input: &mut I) -> Result<u64, CodecError> {
    let remaining = input.len() - input.file_pointer();
    if remaining != FOOTER_LENGTH {
        return Err(CodecError::corrupt(input.name(), format!("misplaced codec footer (file truncated?): remaining={}, expected={}", remaining, FOOTER_LENGTH)));
    }

    let magic = input.read_int()?;
    if magic != FOOTER_MAGIC {
        return Err(CodecError::corrupt(input.name(), format!("codec footer mismatch (file truncated?): actual footer={} vs expected footer={}", magic, FOOTER_MAGIC)));
    }

    let algorithm_id = input.read_int()?;
    if algorithm_id != 0 {
        return Err(CodecError::corrupt(input.name(), format!("codec footer mismatch: unknown algorithmID: {}", algorithm_id)));
    }

    let checksum = input.read_long()? as u64;
    if checksum & 0xFFFFFFFF00000000 != 0 {
        return Err(CodecError::corrupt(input.name(), format!("illegal CRC-32 checksum: {}", checksum)));
    }

    Ok(checksum)
}


/// Reads the checksum stored in the footer without verifying the file's contents
pub fn retrieve_checksum<I: IndexInput + ?Sized>(input: &mut I) -> Result<u64, CodecError> {
    if input.len() < FOOTER_LENGTH {
        return Err(CodecError::corrupt(input.name(), format!("misplaced codec footer (file truncated?): length={} but footer length={}", input.len(), FOOTER_LENGTH)));
    }

    let footer_start = input.len() - FOOTER_LENGTH;
    input.seek(footer_start)?;
    validate_footer(input)
}


/// Recomputes the CRC32 of the whole file and compares it with the footer
pub fn checksum_entire_file<I: IndexInput + ?Sized>(input: &mut I) -> Result<u64, CodecError> {
    let expected = retrieve_checksum(input)?;

    // Everything except the stored checksum itself
    let mut remaining = input.len() - 8;
    let mut hasher = Hasher::new();
    let mut buf = [0; 4096];

    input.seek(0)?;
    while remaining > 0 {
        let chunk = if remaining < buf.len() as u64 { remaining as usize } else { buf.len() };
        input.read_bytes(&mut buf[..chunk])?;
        hasher.update(&buf[..chunk]);
        remaining -= chunk as u64;
    }

    let actual = hasher.finalize() as u64;
    if actual != expected {
        return Err(CodecError::corrupt(input.name(), format!("checksum failed (hardware problem?) : expected={:x} actual={:x}", expected, actual)));
    }

    Ok(actual)
}


/// Verifies the input is positioned at its footer, then checks the whole
/// file's checksum
///
/// Used after reading a small file (such as metadata) in full.
pub fn check_footer<I: IndexInput + ?Sized>(input: &mut I) -> Result<u64, CodecError> {
    let remaining = input.len().saturating_sub(input.file_pointer());
    if remaining != FOOTER_LENGTH {
        return Err(CodecError::corrupt(input.name(), format!("did not read all bytes before the footer: remaining={}, expected={}", remaining, FOOTER_LENGTH)));
    }

    checksum_entire_file(input)
}
