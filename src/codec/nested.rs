//! Serde glue for unions nested inside other types
//!
//! Union families implement `Serialize`/`Deserialize` through their codec, so
//! they can appear as fields of ordinary derived structs. Nested decoding is
//! strict about unknown tags; fields that should drop unknown variants use
//! [`permissive`] or [`permissive_vec`] via `#[serde(deserialize_with)]`.

use super::types::Union;
use crate::types::{DecodeOptions, JsonValue, UnknownVariantPolicy};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a union through its codec
pub fn serialize<U, S>(value: &U, serializer: S) -> Result<S::Ok, S::Error>
where
    U: Union,
    S: Serializer,
{
    value
        .encode_document()
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Deserialize a union through its codec, failing on unknown tags
pub fn deserialize<'de, U, D>(deserializer: D) -> Result<U, D::Error>
where
    U: Union,
    D: Deserializer<'de>,
{
    let doc = JsonValue::deserialize(deserializer)?;
    let options = DecodeOptions::default().with_unknown_variants(UnknownVariantPolicy::Strict);

    U::decode_document(doc, &options)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("union decoded to no value"))
}

/// Deserialize an optional union; null, absent and unknown variants become None
pub fn permissive<'de, U, D>(deserializer: D) -> Result<Option<U>, D::Error>
where
    U: Union,
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(doc) => U::decode_document(doc, &DecodeOptions::default()).map_err(D::Error::custom),
    }
}

/// Deserialize a list of unions, skipping unknown variants
pub fn permissive_vec<'de, U, D>(deserializer: D) -> Result<Vec<U>, D::Error>
where
    U: Union,
    D: Deserializer<'de>,
{
    let docs = Vec::<JsonValue>::deserialize(deserializer)?;
    let options = DecodeOptions::default();
    let mut values = Vec::with_capacity(docs.len());

    for doc in docs {
        if let Some(value) = U::decode_document(doc, &options).map_err(D::Error::custom)? {
            values.push(value);
        }
    }

    Ok(values)
}

/// Implement [`Union`], `Serialize` and `Deserialize` for a union family
/// backed by a static codec.
macro_rules! static_union {
    ($union:ty, $codec:expr) => {
        impl $crate::codec::Union for $union {
            fn decode_document(
                doc: $crate::types::JsonValue,
                options: &$crate::types::DecodeOptions,
            ) -> $crate::error::Result<::std::option::Option<Self>> {
                $crate::codec::UnionCodec::decode_with(&*$codec, doc, options)
            }

            fn encode_document(&self) -> $crate::error::Result<$crate::types::JsonValue> {
                $crate::codec::UnionCodec::encode(&*$codec, self)
            }
        }

        impl serde::Serialize for $union {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                $crate::codec::nested::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $union {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                $crate::codec::nested::deserialize(deserializer)
            }
        }
    };
}

pub(crate) use static_union;
