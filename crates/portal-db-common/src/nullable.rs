//! Nullable-value adapters
//!
//! Domain types carry plain scalars where the zero value means "not set",
//! while storage columns are nullable. [`Nullable`] converts in the storage
//! direction and [`or_zero`] converts back. [`Patch`] describes a single field
//! of a partial update, keeping "not supplied" apart from "cleared".

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Conversion of a native value into its nullable column form
pub trait Nullable: Sized {
    /// `None` when the value is the zero value of its type
    fn into_nullable(self) -> Option<Self>;
}

impl Nullable for String {
    fn into_nullable(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl Nullable for i32 {
    fn into_nullable(self) -> Option<Self> {
        (self != 0).then_some(self)
    }
}

/// Booleans are always stored, `false` is a meaningful value.
impl Nullable for bool {
    fn into_nullable(self) -> Option<Self> {
        Some(self)
    }
}

impl<T> Nullable for Vec<T> {
    fn into_nullable(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Convert a native value into its nullable column form
pub fn nullable<T: Nullable>(value: T) -> Option<T> {
    value.into_nullable()
}

/// Convert a nullable column value back into its native form
pub fn or_zero<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

/// One field of a partial update
///
/// In JSON a missing key is [`Patch::Unchanged`], `null` is [`Patch::Clear`]
/// and any other value is [`Patch::Set`]. Fields must be annotated with
/// `#[serde(default, skip_serializing_if = "Patch::is_unchanged")]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// The field was not supplied; storage keeps its current value
    #[default]
    Unchanged,
    /// The field was supplied as null; storage clears it
    Clear,
    /// The field was supplied with a value
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// `true` when the caller supplied the field, either as a value or as null
    pub fn is_supplied(&self) -> bool {
        !self.is_unchanged()
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    /// Fallible [`Patch::map`]
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Unchanged => Patch::Unchanged,
            Patch::Clear => Patch::Clear,
            Patch::Set(value) => Patch::Set(f(value)?),
        })
    }

    /// The supplied value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Apply the patch to a stored nullable value
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Unchanged => {}
            Patch::Clear => *target = None,
            Patch::Set(value) => *target = Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unchanged | Patch::Clear => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
