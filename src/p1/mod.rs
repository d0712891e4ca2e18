//! The p1 module contains the acquisition side: line sources (blocking, async,
//! mock), the serial port adapter, and the readers composing them with the
//! telegram core.

pub mod line_source;
pub mod mock;
pub mod reader;
pub mod serial;

pub use line_source::{AsyncBufLineSource, AsyncLineSource, BufLineSource, LineSource};
pub use mock::MockLineSource;
pub use reader::{acquire, AsyncP1Reader, P1Reader};
pub use serial::{SerialConfig, SerialLineSource};
