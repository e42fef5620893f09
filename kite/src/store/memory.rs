use std::cmp;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crc32fast::Hasher;

use store::{Directory, IndexOutput, IndexInput, IOContext};


type FileMap = BTreeMap<String, Arc<Vec<u8>>>;


fn lock_poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "directory lock poisoned")
}


fn file_not_found(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", name))
}


/// A directory that keeps all of its files in memory
///
/// A file only becomes visible once the output that's writing it has been
/// closed. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct RAMDirectory {
    files: Arc<RwLock<FileMap>>,
}


impl RAMDirectory {
    pub fn new() -> RAMDirectory {
        RAMDirectory::default()
    }

    fn read_files(&self) -> io::Result<RwLockReadGuard<FileMap>> {
        self.files.read().map_err(|_| lock_poisoned())
    }

    fn write_files(&self) -> io::Result<RwLockWriteGuard<FileMap>> {
        self.files.write().map_err(|_| lock_poisoned())
    }

    /// Returns a copy of a file's contents
    pub fn read_file(&self, name: &str) -> io::Result<Vec<u8>> {
        match self.read_files()?.get(name) {
            Some(data) => Ok((**data).clone()),
            None => Err(file_not_found(name)),
        }
    }

    /// Replaces a file's contents
    pub fn write_file(&self, name: &str, data: Vec<u8>) -> io::Result<()> {
        self.write_files()?.insert(name.to_string(), Arc::new(data));
        Ok(())
    }

    pub fn file_exists(&self, name: &str) -> bool {
        match self.files.read() {
            Ok(files) => files.contains_key(name),
            Err(_) => false,
        }
    }
}


impl Directory for RAMDirectory {
    fn create_output(&self, name: &str, _context: &IOContext) -> io::Result<Box<dyn IndexOutput>> {
        if self.read_files()?.contains_key(name) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("file already exists: {}", name)));
        }

        Ok(Box::new(RAMOutput {
            name: name.to_string(),
            buffer: Vec::new(),
            hasher: Hasher::new(),
            files: self.files.clone(),
        }))
    }

    fn open_input(&self, name: &str, _context: &IOContext) -> io::Result<Box<dyn IndexInput>> {
        match self.read_files()?.get(name) {
            Some(data) => Ok(Box::new(ByteArrayInput::new(name.to_string(), data.clone()))),
            None => Err(file_not_found(name)),
        }
    }

    fn list_all(&self) -> io::Result<Vec<String>> {
        Ok(self.read_files()?.keys().cloned().collect())
    }

    fn file_length(&self, name: &str) -> io::Result<u64> {
        match self.read_files()?.get(name) {
            Some(data) => Ok(data.len() as u64),
            None => Err(file_not_found(name)),
        }
    }

    fn delete_file(&self, name: &str) -> io::Result<()> {
        match self.write_files()?.remove(name) {
            Some(_) => Ok(()),
            None => Err(file_not_found(name)),
        }
    }
}


pub struct RAMOutput {
    name: String,
    buffer: Vec<u8>,
    hasher: Hasher,
    files: Arc<RwLock<FileMap>>,
}


impl Write for RAMOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.hasher.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}


impl IndexOutput for RAMOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_pointer(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn checksum(&self) -> u64 {
        self.hasher.clone().finalize() as u64
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        let output = *self;
        let mut files = output.files.write().map_err(|_| lock_poisoned())?;
        files.insert(output.name, Arc::new(output.buffer));
        Ok(())
    }
}


/// An input reading from a shared, fully loaded file
#[derive(Debug, Clone)]
pub struct ByteArrayInput {
    name: String,
    data: Arc<Vec<u8>>,
    pos: usize,
}


impl ByteArrayInput {
    pub fn new(name: String, data: Arc<Vec<u8>>) -> ByteArrayInput {
        ByteArrayInput {
            name: name,
            data: data,
            pos: 0,
        }
    }
}


impl Read for ByteArrayInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[cmp::min(self.pos, self.data.len())..];
        let len = cmp::min(buf.len(), remaining.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.pos += len;
        Ok(len)
    }
}


impl IndexInput for ByteArrayInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_pointer(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: u64) -> io::Result<()> {
        if pos > self.data.len() as u64 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, format!("seek past EOF: {} > {} ({})", pos, self.data.len(), self.name)));
        }

        self.pos = pos as usize;
        Ok(())
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn clone_input(&self) -> Box<dyn IndexInput> {
        Box::new(ByteArrayInput::new(self.name.clone(), self.data.clone()))
    }
}
