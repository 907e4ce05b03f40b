//! Output writers - render IR as pseudocode.

#[cfg(feature = "write-ib")]
pub mod ib;

#[cfg(feature = "write-ib")]
pub use ib::{FLAG_MARKER, IB_WRITER, IbWriter, IbWriterImpl};
