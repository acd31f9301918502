//! Decoded reply payloads and their typed views

use super::ResultShape;
use crate::network::RespValue;
use std::collections::HashMap;

/// A sorted set member with its score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Z {
    pub score: f64,
    pub member: String,
}

/// A sorted set member together with the key it was popped from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZWithKey {
    pub key: String,
    pub z: Z,
}

/// Members popped from one sorted set key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZSliceWithKey {
    pub key: String,
    pub members: Vec<Z>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// A reply decoded into one of the closed result shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Generic(RespValue),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Slice(Vec<RespValue>),
    StringSlice(Vec<String>),
    IntSlice(Vec<i64>),
    FloatSlice(Vec<f64>),
    BoolSlice(Vec<bool>),
    KeyValueSlice(Vec<KeyValue>),
    MapStringString(HashMap<String, String>),
    MapStringInt(HashMap<String, i64>),
    MapStringValue(HashMap<String, RespValue>),
    MapStringStringSlice(Vec<HashMap<String, String>>),
    MapStringValueSlice(Vec<HashMap<String, RespValue>>),
    MapStringSliceValue(HashMap<String, Vec<RespValue>>),
    MapMapStringValue(HashMap<String, HashMap<String, RespValue>>),
    ZSlice(Vec<Z>),
    ZSliceWithKey(ZSliceWithKey),
    ZWithKey(ZWithKey),
}

impl Reply {
    pub fn shape(&self) -> ResultShape {
        match self {
            Reply::Generic(_) => ResultShape::Generic,
            Reply::String(_) => ResultShape::String,
            Reply::Int(_) => ResultShape::Int,
            Reply::Float(_) => ResultShape::Float,
            Reply::Bool(_) => ResultShape::Bool,
            Reply::Slice(_) => ResultShape::Slice,
            Reply::StringSlice(_) => ResultShape::StringSlice,
            Reply::IntSlice(_) => ResultShape::IntSlice,
            Reply::FloatSlice(_) => ResultShape::FloatSlice,
            Reply::BoolSlice(_) => ResultShape::BoolSlice,
            Reply::KeyValueSlice(_) => ResultShape::KeyValueSlice,
            Reply::MapStringString(_) => ResultShape::MapStringString,
            Reply::MapStringInt(_) => ResultShape::MapStringInt,
            Reply::MapStringValue(_) => ResultShape::MapStringValue,
            Reply::MapStringStringSlice(_) => ResultShape::MapStringStringSlice,
            Reply::MapStringValueSlice(_) => ResultShape::MapStringValueSlice,
            Reply::MapStringSliceValue(_) => ResultShape::MapStringSliceValue,
            Reply::MapMapStringValue(_) => ResultShape::MapMapStringValue,
            Reply::ZSlice(_) => ResultShape::ZSlice,
            Reply::ZSliceWithKey(_) => ResultShape::ZSliceWithKey,
            Reply::ZWithKey(_) => ResultShape::ZWithKey,
        }
    }
}

/// Rust types a reply can be read back as, one per result shape
pub trait ShapeOutput: Sized + Default + Clone {
    const SHAPE: ResultShape;

    /// `None` when the reply holds another shape
    fn from_reply(reply: &Reply) -> Option<Self>;
}

macro_rules! shape_output {
    ($ty:ty, $variant:ident) => {
        impl ShapeOutput for $ty {
            const SHAPE: ResultShape = ResultShape::$variant;

            fn from_reply(reply: &Reply) -> Option<Self> {
                match reply {
                    Reply::$variant(value) => Some(value.clone()),
                    _ => None,
                }
            }
        }
    };
}

shape_output!(RespValue, Generic);
shape_output!(String, String);
shape_output!(i64, Int);
shape_output!(f64, Float);
shape_output!(bool, Bool);
shape_output!(Vec<RespValue>, Slice);
shape_output!(Vec<String>, StringSlice);
shape_output!(Vec<i64>, IntSlice);
shape_output!(Vec<f64>, FloatSlice);
shape_output!(Vec<bool>, BoolSlice);
shape_output!(Vec<KeyValue>, KeyValueSlice);
shape_output!(HashMap<String, String>, MapStringString);
shape_output!(HashMap<String, i64>, MapStringInt);
shape_output!(HashMap<String, RespValue>, MapStringValue);
shape_output!(Vec<HashMap<String, String>>, MapStringStringSlice);
shape_output!(Vec<HashMap<String, RespValue>>, MapStringValueSlice);
shape_output!(HashMap<String, Vec<RespValue>>, MapStringSliceValue);
shape_output!(HashMap<String, HashMap<String, RespValue>>, MapMapStringValue);
shape_output!(Vec<Z>, ZSlice);
shape_output!(ZSliceWithKey, ZSliceWithKey);
shape_output!(ZWithKey, ZWithKey);
