use thiserror::Error;

use crate::descriptor::OsType;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The decoder is deliberately permissive; most recoverable conditions (bad record signature,
/// a known key with no registered decoder) are logged and skipped rather than surfaced here.
/// What remains is the set of conditions that make the remaining stream layout undecidable.
///
/// # Error Categories
///
/// ## Stream structure
/// - [`Error::UnknownDescriptorTag`] - An item/reference/unit tag with no dictionary entry
/// - [`Error::OutOfBounds`] - Attempted to read beyond the supplied region
/// - [`Error::Malformed`] - Corrupted or inconsistent structure
/// - [`Error::RecursionLimit`] - Nesting depth bound exceeded
///
/// ## I/O
/// - [`Error::WriteError`] - Failure writing to the XML output sink
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor grammar is fully tag-driven; once a tag is unrecognized, the size of
    /// the value it introduces cannot be determined and no generic skip is possible. The
    /// caller decides whether this aborts the whole document or just the containing record.
    ///
    /// # Fields
    ///
    /// * `key` - The unmatched 4-byte OSType tag
    /// * `offset` - Byte offset within the region, directly after the tag was read
    #[error("Unknown descriptor tag '{key}' at offset {offset:#x}")]
    UnknownDescriptorTag {
        /// The unmatched 4-byte OSType tag
        key: OsType,
        /// Byte offset within the decoded region where the tag was encountered
        offset: usize,
    },

    /// An out of bound access was attempted while parsing the stream.
    ///
    /// This occurs when a declared count or length reaches beyond the end of the
    /// supplied region. It's a safety check to prevent buffer overruns during parsing.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// The stream is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occurred
        file: &'static str,
        /// The source line in which this error occurred
        line: u32,
    },

    /// Recursion limit reached.
    ///
    /// The descriptor format is a tree by construction, but corrupt or adversarial input
    /// can claim unbounded nesting. A maximum depth is enforced to prevent stack
    /// exhaustion; the associated value is the limit that was reached.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Failure writing XML output to the caller-supplied sink.
    #[error("{0}")]
    WriteError(#[from] std::io::Error),
}
