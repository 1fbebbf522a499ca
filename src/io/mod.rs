//! I/O module
//!
//! Handles CSV reading and entry rendering.
//!
//! # Components
//!
//! - `csv_format` - Record decoding, header skip and width policy
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `template` - Output templates and their loading

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;
pub mod template;

pub use async_reader::AsyncReader;
pub use sync_reader::SyncReader;
pub use template::{load_template, Template, DEFAULT_TEMPLATE};
