use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crc32fast::Hasher;

use store::{Directory, IndexOutput, IndexInput, IOContext};
use store::memory::ByteArrayInput;


const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;
const MERGE_BUFFER_SIZE: usize = 1024 * 1024;


/// A directory backed by a folder on the filesystem
#[derive(Debug, Clone)]
pub struct FSDirectory {
    path: PathBuf,
}


impl FSDirectory {
    /// Opens a directory, creating the folder if it doesn't exist
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<FSDirectory> {
        fs::create_dir_all(path.as_ref())?;

        Ok(FSDirectory {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}


impl Directory for FSDirectory {
    fn create_output(&self, name: &str, context: &IOContext) -> io::Result<Box<dyn IndexOutput>> {
        let file = OpenOptions::new().write(true).create_new(true).open(self.path.join(name))?;

        let buffer_size = match *context {
            IOContext::Merge { .. } => MERGE_BUFFER_SIZE,
            _ => DEFAULT_BUFFER_SIZE,
        };

        Ok(Box::new(FSIndexOutput {
            name: name.to_string(),
            writer: BufWriter::with_capacity(buffer_size, file),
            hasher: Hasher::new(),
            position: 0,
        }))
    }

    fn open_input(&self, name: &str, _context: &IOContext) -> io::Result<Box<dyn IndexInput>> {
        let mut file = File::open(self.path.join(name))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Box::new(ByteArrayInput::new(name.to_string(), Arc::new(data))))
    }

    fn list_all(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn file_length(&self, name: &str) -> io::Result<u64> {
        Ok(fs::metadata(self.path.join(name))?.len())
    }

    fn delete_file(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path.join(name))
    }
}


pub struct FSIndexOutput {
    name: String,
    writer: BufWriter<File>,
    hasher: Hasher,
    position: u64,
}


impl Write for FSIndexOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.writer.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}


impl IndexOutput for FSIndexOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_pointer(&self) -> u64 {
        self.position
    }

    fn checksum(&self) -> u64 {
        self.hasher.clone().finalize() as u64
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        let output = *self;
        let file = output.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}


#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use store::{Directory, DataOutput, DataInput, IndexOutput, IndexInput, IOContext};
    use super::FSDirectory;

    #[test]
    fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let dir = FSDirectory::open(tmp.path().join("index")).unwrap();

        let mut output = dir.create_output("_0.dat", &IOContext::Flush { num_docs: 2 }).unwrap();
        output.write_string("hello").unwrap();
        output.write_int(7).unwrap();
        assert_eq!(output.file_pointer(), 10);
        output.close().unwrap();

        assert_eq!(dir.list_all().unwrap(), vec!["_0.dat".to_string()]);
        assert_eq!(dir.file_length("_0.dat").unwrap(), 10);

        let mut input = dir.open_input("_0.dat", &IOContext::ReadOnce).unwrap();
        assert_eq!(input.read_string().unwrap(), "hello");
        assert_eq!(input.read_int().unwrap(), 7);
        assert_eq!(input.file_pointer(), input.len());
    }

    #[test]
    fn test_create_existing_file() {
        let tmp = TempDir::new().unwrap();
        let dir = FSDirectory::open(tmp.path()).unwrap();

        dir.create_output("_0.dat", &IOContext::Default).unwrap().close().unwrap();
        assert!(dir.create_output("_0.dat", &IOContext::Default).is_err());

        dir.delete_file("_0.dat").unwrap();
        assert!(dir.list_all().unwrap().is_empty());
    }
}
