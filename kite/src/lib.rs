#[macro_use]
extern crate log;
extern crate byteorder;
extern crate crc32fast;
extern crate uuid;

#[cfg(test)]
#[macro_use]
extern crate maplit;
#[cfg(test)]
extern crate tempfile;

pub mod errors;
pub mod schema;
pub mod segment;
pub mod store;
pub mod codec_util;

pub use errors::CodecError;
pub use schema::{FieldRef, FieldInfo, FieldInfos, DocValuesType};
pub use segment::{SegmentInfo, SegmentWriteState, SegmentReadState};
