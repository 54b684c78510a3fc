//! RPC reply envelope.
//!
//! The body of an `<rpc-reply>` is operation specific, so it is kept as the
//! verbatim inner XML for the caller to interpret. Only `<rpc-error>` and
//! `<ok/>` children are understood here.

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::CodecError;

/// An error or warning reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcError {
    pub error_type: String,
    pub tag: String,
    /// `"error"` or anything else, which counts as a warning.
    pub severity: String,
    pub path: String,
    pub message: String,
    /// Verbatim inner XML of `<error-info>`.
    pub info: String,
}

impl RpcError {
    /// Severity is compared case-sensitively against `"error"`.
    pub fn is_error(&self) -> bool {
        self.severity == "error"
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "netconf rpc [{}] '{}'", self.severity, self.message)
    }
}

impl std::error::Error for RpcError {}

/// A decoded `<rpc-reply>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcReply {
    /// `message-id` echoed by the device, if any.
    pub message_id: Option<String>,
    /// `<rpc-error>` children in document order.
    pub errors: Vec<RpcError>,
    /// Verbatim inner content of `<rpc-reply>`.
    pub data: String,
    /// Whether an `<ok/>` element was present.
    pub ok: bool,
    /// The whole frame as received.
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorField {
    Type,
    Tag,
    Severity,
    Path,
    Message,
    Info,
}

impl ErrorField {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"error-type" => Some(Self::Type),
            b"error-tag" => Some(Self::Tag),
            b"error-severity" => Some(Self::Severity),
            b"error-path" => Some(Self::Path),
            b"error-message" => Some(Self::Message),
            b"error-info" => Some(Self::Info),
            _ => None,
        }
    }

    fn assign(self, error: &mut RpcError, value: &str) {
        let slot = match self {
            Self::Type => &mut error.error_type,
            Self::Tag => &mut error.tag,
            Self::Severity => &mut error.severity,
            Self::Path => &mut error.path,
            Self::Message => &mut error.message,
            Self::Info => &mut error.info,
        };
        slot.push_str(value);
    }
}

const ROOT: &str = "rpc-reply";

impl RpcReply {
    /// Decode one received frame.
    pub fn parse(raw: &[u8]) -> Result<Self, CodecError> {
        let text = std::str::from_utf8(raw)?;
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut reply = RpcReply {
            raw: text.to_string(),
            ..Default::default()
        };
        let mut depth = 0usize;
        let mut inner_start = None;
        let mut inner_end = None;
        let mut current: Option<RpcError> = None;
        let mut field: Option<ErrorField> = None;
        let mut info_start = 0usize;

        loop {
            let event = reader.read_event().map_err(CodecError::xml)?;
            let position = reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        1 => {
                            check_root(&e)?;
                            reply.message_id = message_id(&e)?;
                            inner_start = Some(position);
                        }
                        2 if e.local_name().as_ref() == b"rpc-error" => {
                            current = Some(RpcError::default());
                        }
                        3 if current.is_some() => {
                            field = ErrorField::from_name(e.local_name().as_ref());
                            info_start = position;
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => match depth {
                    0 => {
                        check_root(&e)?;
                        reply.message_id = message_id(&e)?;
                        inner_start = Some(position);
                        inner_end = Some(position);
                        break;
                    }
                    1 => match e.local_name().as_ref() {
                        b"ok" => reply.ok = true,
                        b"rpc-error" => reply.errors.push(RpcError::default()),
                        _ => {}
                    },
                    _ => {}
                },
                Event::Text(t) if depth == 3 => {
                    if let (Some(error), Some(f)) = (current.as_mut(), field) {
                        if f != ErrorField::Info {
                            let value = t.unescape().map_err(CodecError::xml)?;
                            f.assign(error, value.trim());
                        }
                    }
                }
                Event::CData(c) if depth == 3 => {
                    if let (Some(error), Some(f)) = (current.as_mut(), field) {
                        if f != ErrorField::Info {
                            let value = c.into_inner();
                            f.assign(error, String::from_utf8_lossy(&value).trim());
                        }
                    }
                }
                Event::End(e) => {
                    match depth {
                        1 => inner_end = Some(closing_tag_start(text, position)),
                        2 if e.local_name().as_ref() == b"rpc-error" => {
                            if let Some(error) = current.take() {
                                reply.errors.push(error);
                            }
                        }
                        3 => {
                            if let (Some(error), Some(ErrorField::Info)) = (current.as_mut(), field) {
                                let end = closing_tag_start(text, position);
                                error.info = text[info_start..end].to_string();
                            }
                            field = None;
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let start = inner_start.ok_or(CodecError::MissingElement(ROOT))?;
        let end = inner_end.ok_or(CodecError::Truncated(ROOT))?;
        reply.data = text[start..end].to_string();
        Ok(reply)
    }

    /// The error that makes this reply a failure, if any: the first with
    /// severity `"error"`, or the first of any severity when warnings are
    /// treated as failures.
    pub fn first_failure(&self, err_on_warnings: bool) -> Option<&RpcError> {
        self.errors
            .iter()
            .find(|e| err_on_warnings || e.is_error())
    }

    /// Errors whose severity is not `"error"`.
    pub fn warnings(&self) -> impl Iterator<Item = &RpcError> {
        self.errors.iter().filter(|e| !e.is_error())
    }
}

fn check_root(start: &BytesStart<'_>) -> Result<(), CodecError> {
    let name = start.local_name();
    if name.as_ref() == ROOT.as_bytes() {
        Ok(())
    } else {
        Err(CodecError::UnexpectedRoot {
            expected: ROOT,
            found: String::from_utf8_lossy(name.as_ref()).into_owned(),
        })
    }
}

fn message_id(start: &BytesStart<'_>) -> Result<Option<String>, CodecError> {
    match start.try_get_attribute("message-id").map_err(CodecError::xml)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(CodecError::xml)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Offset of the `</` that opens the end tag finishing at `end`.
fn closing_tag_start(text: &str, end: usize) -> usize {
    text[..end].rfind("</").unwrap_or(end)
}
