pub mod error;
pub mod header;
pub mod record;
pub mod classify;
pub mod identity;
pub mod naming;
pub mod io_stream;
pub mod archive;

pub use error::{FcaError, FormatError};
pub use header::GlobalHeader;
pub use record::{FileType, Record};
pub use classify::classify;
pub use identity::{IdentityKey, IdentityRecord, IdentityTable, ResolvedName};
pub use archive::{decode, encode, inspect, DecodeOptions, EncodeOptions};
