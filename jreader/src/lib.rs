#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "Growable, re-fillable character reader over an `embedded_io` byte stream."]

/// Error types for `jreader`.
pub mod error;
/// The block-buffered `char` reader.
pub mod reader;

pub use error::{Error, IoError, Result};
pub use reader::{CharReader, MIN_BLOCK};
