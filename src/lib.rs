pub mod atomic;
pub mod capability;
pub mod codec;
pub mod dispatch;
pub mod registry;
pub mod session;

pub use capability::{Capabilities, Engine};
pub use codec::{Codec, CodecError, ErrorKind, FormatId, get_codec};
pub use dispatch::{Dispatcher, read_file, write_file};
pub use registry::lookup;
pub use session::{Session, SessionError};
