//! Redis RESP protocol implementation

use crate::error::{RdCmdError, Result};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

/// RESP value types
///
/// Payloads are text. Bulk strings that are not valid UTF-8 are decoded
/// lossily (invalid sequences become U+FFFD), so binary values do not
/// round-trip but the frame is still consumed and the connection stays usable.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Option<String>),
    Array(Vec<RespValue>),
    /// Null array (`*-1`)
    #[default]
    Nil,
}

impl RespValue {
    /// Either null form: `$-1` or `*-1`
    pub fn is_nil(&self) -> bool {
        matches!(self, RespValue::Nil | RespValue::BulkString(None))
    }

    /// Text of a string-like frame
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RespValue::SimpleString(s) | RespValue::BulkString(Some(s)) => Some(s),
            _ => None,
        }
    }
}

/// Redis RESP protocol codec
#[derive(Debug, Default)]
pub struct RespCodec;

impl RespCodec {
    /// Create a new RESP codec
    pub fn new() -> Self {
        Self
    }

    /// Encode a command as an array of bulk strings
    pub fn encode_command(&self, parts: &[String], dst: &mut BytesMut) {
        dst.put_u8(b'*');
        dst.put_slice(parts.len().to_string().as_bytes());
        dst.put_slice(b"\r\n");
        for part in parts {
            Self::put_bulk(part, dst);
        }
    }

    /// Encode an arbitrary value
    pub fn encode(&self, value: &RespValue, dst: &mut BytesMut) {
        match value {
            RespValue::SimpleString(s) => Self::put_line(b'+', s, dst),
            RespValue::Error(s) => Self::put_line(b'-', s, dst),
            RespValue::Integer(i) => Self::put_line(b':', &i.to_string(), dst),
            RespValue::BulkString(Some(s)) => Self::put_bulk(s, dst),
            RespValue::BulkString(None) => dst.put_slice(b"$-1\r\n"),
            RespValue::Array(items) => {
                Self::put_line(b'*', &items.len().to_string(), dst);
                for item in items {
                    self.encode(item, dst);
                }
            }
            RespValue::Nil => dst.put_slice(b"*-1\r\n"),
        }
    }

    /// Decode one complete value from the front of `src`.
    ///
    /// Returns `Ok(None)` and leaves `src` untouched while the frame is
    /// incomplete; consumed bytes are removed on success.
    pub fn decode(&self, src: &mut BytesMut) -> Result<Option<RespValue>> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(&src[..]);
        match Self::parse_value(&mut cursor)? {
            Some(value) => {
                let consumed = cursor.position() as usize;
                src.advance(consumed);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put_line(prefix: u8, body: &str, dst: &mut BytesMut) {
        dst.put_u8(prefix);
        dst.put_slice(body.as_bytes());
        dst.put_slice(b"\r\n");
    }

    fn put_bulk(body: &str, dst: &mut BytesMut) {
        Self::put_line(b'$', &body.len().to_string(), dst);
        dst.put_slice(body.as_bytes());
        dst.put_slice(b"\r\n");
    }

    fn parse_value(cursor: &mut Cursor<&[u8]>) -> Result<Option<RespValue>> {
        if !cursor.has_remaining() {
            return Ok(None);
        }

        match cursor.get_u8() {
            b'+' => Ok(Self::read_line(cursor)?.map(RespValue::SimpleString)),
            b'-' => Ok(Self::read_line(cursor)?.map(RespValue::Error)),
            b':' => match Self::read_line(cursor)? {
                Some(line) => {
                    let value = line
                        .parse::<i64>()
                        .map_err(|_| RdCmdError::protocol(format!("Invalid integer: {line}")))?;
                    Ok(Some(RespValue::Integer(value)))
                }
                None => Ok(None),
            },
            b'$' => Self::parse_bulk_string(cursor),
            b'*' => Self::parse_array(cursor),
            other => Err(RdCmdError::protocol(format!(
                "Unknown RESP type: {}",
                other as char
            ))),
        }
    }

    /// Parse bulk string ($5\r\nhello\r\n or $-1\r\n for null)
    fn parse_bulk_string(cursor: &mut Cursor<&[u8]>) -> Result<Option<RespValue>> {
        let Some(length) = Self::read_length(cursor, "bulk string")? else {
            return Ok(None);
        };
        let Some(length) = length else {
            return Ok(Some(RespValue::BulkString(None)));
        };

        if cursor.remaining() < length + 2 {
            return Ok(None);
        }

        let start = cursor.position() as usize;
        let data = &cursor.get_ref()[start..start + length];
        let terminator = &cursor.get_ref()[start + length..start + length + 2];
        if terminator != b"\r\n" {
            return Err(RdCmdError::protocol(
                "Missing \\r\\n terminator for bulk string",
            ));
        }

        let text = String::from_utf8_lossy(data).into_owned();
        cursor.advance(length + 2);
        Ok(Some(RespValue::BulkString(Some(text))))
    }

    /// Parse array (*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n)
    fn parse_array(cursor: &mut Cursor<&[u8]>) -> Result<Option<RespValue>> {
        let Some(length) = Self::read_length(cursor, "array")? else {
            return Ok(None);
        };
        let Some(length) = length else {
            return Ok(Some(RespValue::Nil));
        };

        let mut elements = Vec::with_capacity(length.min(1024));
        for _ in 0..length {
            match Self::parse_value(cursor)? {
                Some(element) => elements.push(element),
                None => return Ok(None),
            }
        }
        Ok(Some(RespValue::Array(elements)))
    }

    /// `Some(None)` is the -1 null length
    fn read_length(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<Option<Option<usize>>> {
        let Some(line) = Self::read_line(cursor)? else {
            return Ok(None);
        };
        let length = line
            .parse::<i64>()
            .map_err(|_| RdCmdError::protocol(format!("Invalid {what} length: {line}")))?;
        match length {
            -1 => Ok(Some(None)),
            n if n < 0 => Err(RdCmdError::protocol(format!(
                "Invalid {what} length: {n}"
            ))),
            n => Ok(Some(Some(n as usize))),
        }
    }

    /// Read a line terminated by \r\n
    fn read_line(cursor: &mut Cursor<&[u8]>) -> Result<Option<String>> {
        let start = cursor.position() as usize;
        let data = *cursor.get_ref();

        let Some(offset) = data[start..].windows(2).position(|w| w == b"\r\n") else {
            return Ok(None);
        };

        let line = std::str::from_utf8(&data[start..start + offset])
            .map_err(|_| RdCmdError::protocol("Invalid UTF-8 in line"))?
            .to_string();
        cursor.set_position((start + offset + 2) as u64);
        Ok(Some(line))
    }
}
