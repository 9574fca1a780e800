pub mod marble;
pub mod paged_seq;

pub use marble::{play, Marble, MarbleGame, ParseError, Setup};
pub use paged_seq::{ConfigError, PageConfig, PagedSeq, PositionError};
