use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::tag::Tag;

/// A designer-authored parameter value.
///
/// `InputRef` and `AutoRef` are resolved lazily against the evaluating
/// context; the other variants are literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Param {
    Float(f32),
    Int(i32),
    Tag(Tag),
    /// Resolves through an input provider to a float.
    InputRef(Tag),
    /// Resolves through an input or parameter provider depending on the
    /// tag's root segment.
    AutoRef(Tag),
}

impl Param {
    /// Numeric view of a literal parameter; refs and tags read as 0.
    pub fn as_float(&self) -> f32 {
        match self {
            Param::Float(v) => *v,
            Param::Int(v) => *v as f32,
            _ => 0.0,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Param::Tag(t) => Some(t),
            _ => None,
        }
    }
}

impl Default for Param {
    fn default() -> Self {
        Param::Float(0.0)
    }
}

/// Named parameters, ordered deterministically.
pub type ParamMap = BTreeMap<String, Param>;

/// A typed slot value exported by queries and parameter providers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContextValue<A> {
    Float(f32),
    Int(i32),
    Tag(Tag),
    Actor(A),
    Location(Vec3),
}

impl<A> ContextValue<A> {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            ContextValue::Float(v) => Some(*v),
            ContextValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Literal [`Param`] form, when one exists. Actors and locations have no
    /// parameter representation.
    pub fn to_param(&self) -> Option<Param> {
        match self {
            ContextValue::Float(v) => Some(Param::Float(*v)),
            ContextValue::Int(v) => Some(Param::Int(*v)),
            ContextValue::Tag(t) => Some(Param::Tag(t.clone())),
            ContextValue::Actor(_) | ContextValue::Location(_) => None,
        }
    }
}
