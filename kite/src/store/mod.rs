pub mod memory;
pub mod fs;
pub mod io_utils;

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};


/// Hints passed to a directory about how a file is going to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IOContext {
    Default,

    /// Writing a freshly flushed segment
    Flush {
        num_docs: u32,
    },

    /// Writing a segment produced by a merge
    Merge {
        estimated_segment_size: u64,
    },

    /// The file will be read sequentially, once
    ReadOnce,
}


impl Default for IOContext {
    fn default() -> IOContext {
        IOContext::Default
    }
}


/// Primitive encodings shared by every output
///
/// Fixed width integers are big endian. Variable length integers use 7 bits
/// per byte, low order group first, with the high bit set on every byte except
/// the last.
pub trait DataOutput: Write {
    #[inline]
    fn write_byte(&mut self, b: u8) -> io::Result<()> {
        self.write_u8(b)
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    #[inline]
    fn write_short(&mut self, value: i16) -> io::Result<()> {
        self.write_i16::<BigEndian>(value)
    }

    #[inline]
    fn write_int(&mut self, value: i32) -> io::Result<()> {
        self.write_i32::<BigEndian>(value)
    }

    #[inline]
    fn write_long(&mut self, value: i64) -> io::Result<()> {
        self.write_i64::<BigEndian>(value)
    }

    /// Negative values are allowed but always take five bytes
    fn write_vint(&mut self, value: i32) -> io::Result<()> {
        let mut value = value as u32;

        while value & !0x7F != 0 {
            self.write_u8(((value & 0x7F) | 0x80) as u8)?;
            value >>= 7;
        }

        self.write_u8(value as u8)
    }

    fn write_string(&mut self, string: &str) -> io::Result<()> {
        self.write_vint(string.len() as i32)?;
        self.write_all(string.as_bytes())
    }
}


impl<W: Write + ?Sized> DataOutput for W {}


/// Counterpart of `DataOutput`
pub trait DataInput: Read {
    #[inline]
    fn read_byte(&mut self) -> io::Result<u8> {
        self.read_u8()
    }

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }

    #[inline]
    fn read_short(&mut self) -> io::Result<i16> {
        self.read_i16::<BigEndian>()
    }

    #[inline]
    fn read_int(&mut self) -> io::Result<i32> {
        self.read_i32::<BigEndian>()
    }

    #[inline]
    fn read_long(&mut self) -> io::Result<i64> {
        self.read_i64::<BigEndian>()
    }

    fn read_vint(&mut self) -> io::Result<i32> {
        let mut value: u32 = 0;

        for shift in 0..5 {
            let b = self.read_u8()?;

            if shift == 4 && b & 0xF0 != 0 {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "invalid vint detected (too many bits)"));
            }

            value |= ((b & 0x7F) as u32) << (shift * 7);

            if b & 0x80 == 0 {
                return Ok(value as i32);
            }
        }

        Err(io::Error::new(io::ErrorKind::InvalidData, "invalid vint detected (too many bytes)"))
    }

    fn read_string(&mut self) -> io::Result<String> {
        let length = self.read_vint()?;
        if length < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, format!("invalid string length: {}", length)));
        }

        let mut bytes = vec![0; length as usize];
        self.read_exact(&mut bytes)?;

        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}


impl<R: Read + ?Sized> DataInput for R {}


/// An append-only output file
///
/// Implementations keep a running CRC32 of everything written so footers can
/// be produced without re-reading the file.
pub trait IndexOutput: Write {
    fn name(&self) -> &str;

    /// Number of bytes written so far
    fn file_pointer(&self) -> u64;

    /// CRC32 of every byte written so far
    fn checksum(&self) -> u64;

    /// Flushes and releases the file
    fn close(self: Box<Self>) -> io::Result<()>;
}


/// A random-access input file
pub trait IndexInput: Read {
    fn name(&self) -> &str;

    fn file_pointer(&self) -> u64;

    fn seek(&mut self, pos: u64) -> io::Result<()>;

    fn len(&self) -> u64;

    /// An independent input over the same file, positioned at the start
    fn clone_input(&self) -> Box<dyn IndexInput>;
}


pub trait Directory {
    /// Creates a new file. Fails if a file with this name already exists
    fn create_output(&self, name: &str, context: &IOContext) -> io::Result<Box<dyn IndexOutput>>;

    fn open_input(&self, name: &str, context: &IOContext) -> io::Result<Box<dyn IndexInput>>;

    fn list_all(&self) -> io::Result<Vec<String>>;

    fn file_length(&self, name: &str) -> io::Result<u64>;

    fn delete_file(&self, name: &str) -> io::Result<()>;
}
