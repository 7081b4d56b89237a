// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Payload conversion between user types and the wire.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A payload could not be converted to or from its wire form.
#[derive(Debug, Error)]
#[error("conversion error: {0}")]
pub struct ConvertError(#[from] serde_json::Error);

/// Conversion seam between typed values and raw wire payloads.
///
/// Handler variants are generic over this so the runtime never commits to a
/// concrete encoding; [`JsonConverter`] is the default and the only encoding
/// the control plane currently speaks.
pub trait Converter: Send + Sync {
    /// Serialize a value into wire bytes.
    fn to_wire<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConvertError>;

    /// Deserialize wire bytes into a value of the target type.
    fn from_wire<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ConvertError>;
}

/// JSON converter backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl Converter for JsonConverter {
    fn to_wire<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ConvertError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn from_wire<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, ConvertError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
