//! Error types for device ports and memory images.
//!
//! Every failure here is a setup or wiring problem. A device producing the
//! wrong value is never a `SimError`; that is a mismatch, counted by the harness.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while driving a device or loading a memory image.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The device has no port with this name.
    #[error("device '{device}' has no port named '{port}'")]
    UnknownPort {
        /// The device name.
        device: String,
        /// The requested port name.
        port: String,
    },

    /// An output port was written.
    #[error("port '{port}' of device '{device}' is an output and cannot be driven")]
    NotAnInput {
        /// The device name.
        device: String,
        /// The offending port name.
        port: String,
    },

    /// A value does not fit in the port's width.
    #[error("value {value:#x} does not fit in {width}-bit port '{port}'")]
    ValueTooWide {
        /// The port name.
        port: String,
        /// The rejected value.
        value: u64,
        /// The port width in bits.
        width: u32,
    },

    /// A memory image file does not exist.
    #[error("memory image not found: {}", path.display())]
    ImageNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// A memory image file could not be read.
    #[error("failed to read memory image {}: {source}", path.display())]
    ImageIo {
        /// The image path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line of a memory image is not a valid byte in hexadecimal.
    #[error("{}:{line}: invalid image entry '{text}'", path.display())]
    ImageParse {
        /// The image path.
        path: PathBuf,
        /// The 1-based line number.
        line: usize,
        /// The offending text.
        text: String,
    },

    /// A memory image contains no entries.
    #[error("memory image {} is empty", path.display())]
    EmptyImage {
        /// The image path.
        path: PathBuf,
    },
}
