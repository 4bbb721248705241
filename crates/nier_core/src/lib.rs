pub mod bits;
pub mod codec;
pub mod core_api;
pub mod error;
pub mod layout;
pub mod nier;
pub mod reader;
pub mod record;
pub mod search;
pub mod tables;
pub mod value;

pub use error::{CodecError, ErrorKind, Result};
pub use nier::{BundleVersion, Header, SaveBundle, SaveSlot};
pub use record::{Layout, Record, raw_diff};
pub use value::{RawCopy, Value};
