//! Delimiter and prompt matching over a partial-read byte stream.
//!
//! Matching always runs over the accumulated buffer, never a single read,
//! so a delimiter split across two reads is still found. Bytes following a
//! match stay buffered for the next wait.

use std::io::{self, Read};
use std::ops::Range;

use memchr::memmem;
use regex::bytes::Regex;
use tracing::trace;

use super::TransportError;

/// Size of each read from the underlying stream.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Location of a match inside the accumulated buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub start: usize,
    pub end: usize,
    /// Capture group ranges; empty for exact byte patterns.
    pub groups: Vec<Option<Range<usize>>>,
}

/// Something [`FrameReader::wait_for`] can wait for.
pub trait Pattern {
    /// Find the first match in `haystack`.
    ///
    /// `haystack[..scanned]` is known to contain no match, which lets exact
    /// patterns skip rescanning it.
    fn find(&self, haystack: &[u8], scanned: usize) -> Option<Found>;
}

impl Pattern for [u8] {
    fn find(&self, haystack: &[u8], scanned: usize) -> Option<Found> {
        if self.is_empty() {
            return Some(Found {
                start: 0,
                end: 0,
                groups: Vec::new(),
            });
        }
        // A match may straddle the old end of the buffer.
        let from = scanned.min(haystack.len()).saturating_sub(self.len() - 1);
        memmem::find(&haystack[from..], self).map(|i| Found {
            start: from + i,
            end: from + i + self.len(),
            groups: Vec::new(),
        })
    }
}

impl Pattern for str {
    fn find(&self, haystack: &[u8], scanned: usize) -> Option<Found> {
        Pattern::find(self.as_bytes(), haystack, scanned)
    }
}

/// Regex patterns match raw bytes, so stray non-UTF-8 output such as a
/// Latin-1 banner does not hide later prompts. They are re-run from the
/// start on every read.
impl Pattern for Regex {
    fn find(&self, haystack: &[u8], _scanned: usize) -> Option<Found> {
        let captures = self.captures(haystack)?;
        let whole = captures.get(0)?;
        let groups = (1..captures.len())
            .map(|i| captures.get(i).map(|m| m.start()..m.end()))
            .collect();
        Some(Found {
            start: whole.start(),
            end: whole.end(),
            groups,
        })
    }
}

/// Result of a successful wait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matched {
    /// Everything read before the match.
    pub preceding: Vec<u8>,
    /// The matched bytes themselves.
    pub matched: Vec<u8>,
    /// Capture groups, in order; `None` for groups that did not take part.
    pub groups: Vec<Option<Vec<u8>>>,
}

/// Buffered reader that waits for patterns.
pub struct FrameReader<R> {
    inner: R,
    pending: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    /// Bytes read from the stream but not yet consumed by a match.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read until `pattern` matches the accumulated input.
    ///
    /// Fails with [`TransportError::NotFound`] if the stream ends first and
    /// with [`TransportError::Read`] on any read error other than
    /// `Interrupted`.
    pub fn wait_for<P: Pattern + ?Sized>(&mut self, pattern: &P) -> Result<Matched, TransportError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut scanned = 0;

        loop {
            if let Some(found) = pattern.find(&self.pending, scanned) {
                return Ok(self.take_match(found));
            }
            scanned = self.pending.len();

            let n = match self.inner.read(&mut chunk) {
                Ok(0) => {
                    return Err(TransportError::NotFound {
                        buffered: self.pending.len(),
                    })
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Read(e)),
            };
            trace!(bytes = n, buffered = scanned + n, "read chunk");
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }

    fn take_match(&mut self, found: Found) -> Matched {
        let rest = self.pending.split_off(found.end);
        let mut head = std::mem::replace(&mut self.pending, rest);

        let groups = found
            .groups
            .into_iter()
            .map(|range| range.map(|r| head[r].to_vec()))
            .collect();
        let matched = head.split_off(found.start);

        Matched {
            preceding: head,
            matched,
            groups,
        }
    }
}
