//! The closed set of result shapes and their decoders
//!
//! Every shape owns a zero value and a decode routine; [`ResultShape::decode`]
//! is a single exhaustive match so adding a shape cannot leave a gap.

use super::reply::{KeyValue, Reply, ZSliceWithKey, ZWithKey, Z};
use crate::error::{RdCmdError, Result};
use crate::network::RespValue;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    Generic,
    String,
    Int,
    Float,
    Bool,
    Slice,
    StringSlice,
    IntSlice,
    FloatSlice,
    BoolSlice,
    KeyValueSlice,
    MapStringString,
    MapStringInt,
    MapStringValue,
    MapStringStringSlice,
    MapStringValueSlice,
    MapStringSliceValue,
    MapMapStringValue,
    ZSlice,
    ZSliceWithKey,
    ZWithKey,
}

impl ResultShape {
    pub const ALL: [ResultShape; 21] = [
        ResultShape::Generic,
        ResultShape::String,
        ResultShape::Int,
        ResultShape::Float,
        ResultShape::Bool,
        ResultShape::Slice,
        ResultShape::StringSlice,
        ResultShape::IntSlice,
        ResultShape::FloatSlice,
        ResultShape::BoolSlice,
        ResultShape::KeyValueSlice,
        ResultShape::MapStringString,
        ResultShape::MapStringInt,
        ResultShape::MapStringValue,
        ResultShape::MapStringStringSlice,
        ResultShape::MapStringValueSlice,
        ResultShape::MapStringSliceValue,
        ResultShape::MapMapStringValue,
        ResultShape::ZSlice,
        ResultShape::ZSliceWithKey,
        ResultShape::ZWithKey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResultShape::Generic => "generic",
            ResultShape::String => "string",
            ResultShape::Int => "int",
            ResultShape::Float => "float",
            ResultShape::Bool => "bool",
            ResultShape::Slice => "slice",
            ResultShape::StringSlice => "string-slice",
            ResultShape::IntSlice => "int-slice",
            ResultShape::FloatSlice => "float-slice",
            ResultShape::BoolSlice => "bool-slice",
            ResultShape::KeyValueSlice => "key-value-slice",
            ResultShape::MapStringString => "map-string-string",
            ResultShape::MapStringInt => "map-string-int",
            ResultShape::MapStringValue => "map-string-value",
            ResultShape::MapStringStringSlice => "map-string-string-slice",
            ResultShape::MapStringValueSlice => "map-string-value-slice",
            ResultShape::MapStringSliceValue => "map-string-slice-value",
            ResultShape::MapMapStringValue => "map-map-string-value",
            ResultShape::ZSlice => "z-slice",
            ResultShape::ZSliceWithKey => "z-slice-with-key",
            ResultShape::ZWithKey => "z-with-key",
        }
    }

    /// Look a shape up by name; unknown names fall back to `Generic`
    pub fn from_name(name: &str) -> ResultShape {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == wanted)
            .unwrap_or(ResultShape::Generic)
    }

    /// The value a handle reports when there is nothing to decode
    pub fn zero(&self) -> Reply {
        match self {
            ResultShape::Generic => Reply::Generic(RespValue::Nil),
            ResultShape::String => Reply::String(String::new()),
            ResultShape::Int => Reply::Int(0),
            ResultShape::Float => Reply::Float(0.0),
            ResultShape::Bool => Reply::Bool(false),
            ResultShape::Slice => Reply::Slice(Vec::new()),
            ResultShape::StringSlice => Reply::StringSlice(Vec::new()),
            ResultShape::IntSlice => Reply::IntSlice(Vec::new()),
            ResultShape::FloatSlice => Reply::FloatSlice(Vec::new()),
            ResultShape::BoolSlice => Reply::BoolSlice(Vec::new()),
            ResultShape::KeyValueSlice => Reply::KeyValueSlice(Vec::new()),
            ResultShape::MapStringString => Reply::MapStringString(HashMap::new()),
            ResultShape::MapStringInt => Reply::MapStringInt(HashMap::new()),
            ResultShape::MapStringValue => Reply::MapStringValue(HashMap::new()),
            ResultShape::MapStringStringSlice => Reply::MapStringStringSlice(Vec::new()),
            ResultShape::MapStringValueSlice => Reply::MapStringValueSlice(Vec::new()),
            ResultShape::MapStringSliceValue => Reply::MapStringSliceValue(HashMap::new()),
            ResultShape::MapMapStringValue => Reply::MapMapStringValue(HashMap::new()),
            ResultShape::ZSlice => Reply::ZSlice(Vec::new()),
            ResultShape::ZSliceWithKey => Reply::ZSliceWithKey(ZSliceWithKey::default()),
            ResultShape::ZWithKey => Reply::ZWithKey(ZWithKey::default()),
        }
    }

    /// Decode a non-nil, non-error frame into this shape
    pub fn decode(&self, frame: RespValue) -> Result<Reply> {
        let d = Decoder { shape: *self };
        let reply = match self {
            ResultShape::Generic => Reply::Generic(frame),
            ResultShape::String => Reply::String(d.string(frame)?),
            ResultShape::Int => Reply::Int(d.int(frame)?),
            ResultShape::Float => Reply::Float(d.float(frame)?),
            ResultShape::Bool => Reply::Bool(d.boolean(frame)?),
            ResultShape::Slice => Reply::Slice(d.array(frame)?),
            ResultShape::StringSlice => Reply::StringSlice(d.each(frame, Decoder::string_or_empty)?),
            ResultShape::IntSlice => Reply::IntSlice(d.each(frame, Decoder::int_or_zero)?),
            ResultShape::FloatSlice => Reply::FloatSlice(d.each(frame, Decoder::float_or_zero)?),
            ResultShape::BoolSlice => Reply::BoolSlice(d.each(frame, Decoder::bool_or_false)?),
            ResultShape::KeyValueSlice => Reply::KeyValueSlice(d.key_values(frame)?),
            ResultShape::MapStringString => {
                Reply::MapStringString(d.map(frame, Decoder::string_or_empty)?)
            }
            ResultShape::MapStringInt => Reply::MapStringInt(d.map(frame, Decoder::int)?),
            ResultShape::MapStringValue => Reply::MapStringValue(d.map(frame, Decoder::raw)?),
            ResultShape::MapStringStringSlice => Reply::MapStringStringSlice(
                d.each(frame, |d, item| d.map(item, Decoder::string_or_empty))?,
            ),
            ResultShape::MapStringValueSlice => {
                Reply::MapStringValueSlice(d.each(frame, |d, item| d.map(item, Decoder::raw))?)
            }
            ResultShape::MapStringSliceValue => {
                Reply::MapStringSliceValue(d.map(frame, Decoder::array)?)
            }
            ResultShape::MapMapStringValue => {
                Reply::MapMapStringValue(d.map(frame, |d, item| d.map(item, Decoder::raw))?)
            }
            ResultShape::ZSlice => Reply::ZSlice(d.z_slice(frame)?),
            ResultShape::ZSliceWithKey => Reply::ZSliceWithKey(d.z_slice_with_key(frame)?),
            ResultShape::ZWithKey => Reply::ZWithKey(d.z_with_key(frame)?),
        };
        Ok(reply)
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-shape decoding helpers; errors are tagged with the requested shape
struct Decoder {
    shape: ResultShape,
}

impl Decoder {
    fn fail(&self, message: impl Into<String>) -> RdCmdError {
        RdCmdError::decode(self.shape, message)
    }

    fn raw(&self, frame: RespValue) -> Result<RespValue> {
        Ok(frame)
    }

    fn string(&self, frame: RespValue) -> Result<String> {
        match frame {
            RespValue::SimpleString(s) | RespValue::BulkString(Some(s)) => Ok(s),
            RespValue::Integer(i) => Ok(i.to_string()),
            other => Err(self.fail(format!("expected a string, got {other:?}"))),
        }
    }

    fn int(&self, frame: RespValue) -> Result<i64> {
        match frame {
            RespValue::Integer(i) => Ok(i),
            RespValue::SimpleString(s) | RespValue::BulkString(Some(s)) => s
                .parse::<i64>()
                .map_err(|_| self.fail(format!("'{s}' is not an integer"))),
            other => Err(self.fail(format!("expected an integer, got {other:?}"))),
        }
    }

    fn float(&self, frame: RespValue) -> Result<f64> {
        match frame {
            RespValue::Integer(i) => Ok(i as f64),
            RespValue::SimpleString(s) | RespValue::BulkString(Some(s)) => s
                .parse::<f64>()
                .map_err(|_| self.fail(format!("'{s}' is not a float"))),
            other => Err(self.fail(format!("expected a float, got {other:?}"))),
        }
    }

    fn boolean(&self, frame: RespValue) -> Result<bool> {
        match frame {
            RespValue::Integer(i) => Ok(i == 1),
            RespValue::SimpleString(s) | RespValue::BulkString(Some(s)) => Ok(s == "OK"),
            other => Err(self.fail(format!("expected a boolean, got {other:?}"))),
        }
    }

    // Nil elements inside a collection decode to the element's zero value.

    fn string_or_empty(&self, frame: RespValue) -> Result<String> {
        if frame.is_nil() {
            return Ok(String::new());
        }
        self.string(frame)
    }

    fn int_or_zero(&self, frame: RespValue) -> Result<i64> {
        if frame.is_nil() {
            return Ok(0);
        }
        self.int(frame)
    }

    fn float_or_zero(&self, frame: RespValue) -> Result<f64> {
        if frame.is_nil() {
            return Ok(0.0);
        }
        self.float(frame)
    }

    fn bool_or_false(&self, frame: RespValue) -> Result<bool> {
        if frame.is_nil() {
            return Ok(false);
        }
        self.boolean(frame)
    }

    fn array(&self, frame: RespValue) -> Result<Vec<RespValue>> {
        match frame {
            RespValue::Array(items) => Ok(items),
            other => Err(self.fail(format!("expected an array, got {other:?}"))),
        }
    }

    fn each<T>(
        &self,
        frame: RespValue,
        f: impl Fn(&Self, RespValue) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.array(frame)?
            .into_iter()
            .map(|item| f(self, item))
            .collect()
    }

    /// Flat `[k1, v1, k2, v2, ...]` or nested `[[k1, v1], ...]` pairs
    fn pairs(&self, frame: RespValue) -> Result<Vec<(RespValue, RespValue)>> {
        let items = self.array(frame)?;
        let nested = !items.is_empty()
            && items
                .iter()
                .all(|item| matches!(item, RespValue::Array(inner) if inner.len() == 2));

        if nested {
            return items
                .into_iter()
                .map(|item| {
                    let mut inner = self.array(item)?.into_iter();
                    match (inner.next(), inner.next()) {
                        (Some(k), Some(v)) => Ok((k, v)),
                        _ => Err(self.fail("pair must have two elements")),
                    }
                })
                .collect();
        }

        if items.len() % 2 != 0 {
            return Err(self.fail(format!(
                "expected an even number of elements, got {}",
                items.len()
            )));
        }

        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            pairs.push((k, v));
        }
        Ok(pairs)
    }

    fn map<V>(
        &self,
        frame: RespValue,
        value: impl Fn(&Self, RespValue) -> Result<V>,
    ) -> Result<HashMap<String, V>> {
        let pairs = self.pairs(frame)?;
        let mut map = HashMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            map.insert(self.string(k)?, value(self, v)?);
        }
        Ok(map)
    }

    fn key_values(&self, frame: RespValue) -> Result<Vec<KeyValue>> {
        self.pairs(frame)?
            .into_iter()
            .map(|(k, v)| {
                Ok(KeyValue {
                    key: self.string(k)?,
                    value: self.string_or_empty(v)?,
                })
            })
            .collect()
    }

    fn z(&self, member: RespValue, score: RespValue) -> Result<Z> {
        Ok(Z {
            member: self.string(member)?,
            score: self.float(score)?,
        })
    }

    fn z_slice(&self, frame: RespValue) -> Result<Vec<Z>> {
        self.pairs(frame)?
            .into_iter()
            .map(|(member, score)| self.z(member, score))
            .collect()
    }

    /// `[key, [[member, score], ...]]`
    fn z_slice_with_key(&self, frame: RespValue) -> Result<ZSliceWithKey> {
        let mut items = self.array(frame)?.into_iter();
        match (items.next(), items.next(), items.next()) {
            (Some(key), Some(members), None) => Ok(ZSliceWithKey {
                key: self.string(key)?,
                members: self.z_slice(members)?,
            }),
            _ => Err(self.fail("expected [key, members]")),
        }
    }

    /// `[key, member, score]`
    fn z_with_key(&self, frame: RespValue) -> Result<ZWithKey> {
        let mut items = self.array(frame)?.into_iter();
        match (items.next(), items.next(), items.next(), items.next()) {
            (Some(key), Some(member), Some(score), None) => Ok(ZWithKey {
                key: self.string(key)?,
                z: self.z(member, score)?,
            }),
            _ => Err(self.fail("expected [key, member, score]")),
        }
    }
}
