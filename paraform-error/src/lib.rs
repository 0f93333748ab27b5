//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that every fallible operation in the workspace returns.
//!
//! Errors produced by the parser point at regions of the source expression. Errors produced while
//! normalizing, generating or scheduling an expression usually have no source to point at (the
//! tree has been rewritten by then), so their [`Error::spans`] are empty and the report consists of
//! the message, help and note alone.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display}, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually derived with `paraform_attrs::ErrorKind`.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error as [`Any`], so that callers can inspect the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// The one-line message of the error, without any source context.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that does not point at any source code.
    pub fn unspanned(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Returns the kind of this error if it is of type `T`.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Returns true if the kind of this error is of type `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the report of this error to the given writer, using `input` as the source the spans
    /// point into.
    pub fn write_report(&self, src_id: &str, input: &str, writer: impl io::Write) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(input)), writer)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}
