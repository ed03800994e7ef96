//! Protobuf encoding for StooKV messages.
//!
//! Manual prost::Message implementations for the `proto.KVService`
//! request and response types, so no proto codegen is needed at build time.

use prost::encoding::{self, DecodeContext, WireType};
use prost::{DecodeError, Message};
use std::collections::HashMap;

// ============================================================================
// GetRequest
// ============================================================================

/// Point lookup of a key within a namespace/profile.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct GetRequest {
    pub namespace: String, // field 1
    pub profile: String,   // field 2
    pub key: String,       // field 3
}

impl Message for GetRequest {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        if !self.namespace.is_empty() {
            encoding::string::encode(1, &self.namespace, buf);
        }
        if !self.profile.is_empty() {
            encoding::string::encode(2, &self.profile, buf);
        }
        if !self.key.is_empty() {
            encoding::string::encode(3, &self.key, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.namespace, buf, ctx),
            2 => encoding::string::merge(wire_type, &mut self.profile, buf, ctx),
            3 => encoding::string::merge(wire_type, &mut self.key, buf, ctx),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.namespace.is_empty() {
            len += encoding::string::encoded_len(1, &self.namespace);
        }
        if !self.profile.is_empty() {
            len += encoding::string::encoded_len(2, &self.profile);
        }
        if !self.key.is_empty() {
            len += encoding::string::encoded_len(3, &self.key);
        }
        len
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// SetKeyRequest
// ============================================================================

/// Write of a key, used by both the plain and the secret write.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct SetKeyRequest {
    pub namespace: String, // field 1
    pub profile: String,   // field 2
    pub key: String,       // field 3
    pub value: String,     // field 4
}

impl Message for SetKeyRequest {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        if !self.namespace.is_empty() {
            encoding::string::encode(1, &self.namespace, buf);
        }
        if !self.profile.is_empty() {
            encoding::string::encode(2, &self.profile, buf);
        }
        if !self.key.is_empty() {
            encoding::string::encode(3, &self.key, buf);
        }
        if !self.value.is_empty() {
            encoding::string::encode(4, &self.value, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.namespace, buf, ctx),
            2 => encoding::string::merge(wire_type, &mut self.profile, buf, ctx),
            3 => encoding::string::merge(wire_type, &mut self.key, buf, ctx),
            4 => encoding::string::merge(wire_type, &mut self.value, buf, ctx),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.namespace.is_empty() {
            len += encoding::string::encoded_len(1, &self.namespace);
        }
        if !self.profile.is_empty() {
            len += encoding::string::encoded_len(2, &self.profile);
        }
        if !self.key.is_empty() {
            len += encoding::string::encoded_len(3, &self.key);
        }
        if !self.value.is_empty() {
            len += encoding::string::encoded_len(4, &self.value);
        }
        len
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// DeleteKeyRequest
// ============================================================================

/// Removal of a key.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DeleteKeyRequest {
    pub namespace: String, // field 1
    pub profile: String,   // field 2
    pub key: String,       // field 3
}

impl Message for DeleteKeyRequest {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        if !self.namespace.is_empty() {
            encoding::string::encode(1, &self.namespace, buf);
        }
        if !self.profile.is_empty() {
            encoding::string::encode(2, &self.profile, buf);
        }
        if !self.key.is_empty() {
            encoding::string::encode(3, &self.key, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.namespace, buf, ctx),
            2 => encoding::string::merge(wire_type, &mut self.profile, buf, ctx),
            3 => encoding::string::merge(wire_type, &mut self.key, buf, ctx),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.namespace.is_empty() {
            len += encoding::string::encoded_len(1, &self.namespace);
        }
        if !self.profile.is_empty() {
            len += encoding::string::encoded_len(2, &self.profile);
        }
        if !self.key.is_empty() {
            len += encoding::string::encoded_len(3, &self.key);
        }
        len
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// GetByNamespaceAndProfileRequest
// ============================================================================

/// Bulk read of every key in a namespace/profile.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct GetByNamespaceAndProfileRequest {
    pub namespace: String, // field 1
    pub profile: String,   // field 2
}

impl Message for GetByNamespaceAndProfileRequest {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        if !self.namespace.is_empty() {
            encoding::string::encode(1, &self.namespace, buf);
        }
        if !self.profile.is_empty() {
            encoding::string::encode(2, &self.profile, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.namespace, buf, ctx),
            2 => encoding::string::merge(wire_type, &mut self.profile, buf, ctx),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        let mut len = 0;
        if !self.namespace.is_empty() {
            len += encoding::string::encoded_len(1, &self.namespace);
        }
        if !self.profile.is_empty() {
            len += encoding::string::encoded_len(2, &self.profile);
        }
        len
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// DataResponse
// ============================================================================

/// Single string payload returned by the point operations.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DataResponse {
    pub data: String, // field 1
}

impl DataResponse {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl Message for DataResponse {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        if !self.data.is_empty() {
            encoding::string::encode(1, &self.data, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.data, buf, ctx),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            encoding::string::encoded_len(1, &self.data)
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// MapResponse
// ============================================================================

/// Key/value pairs returned by the bulk read. Order is not meaningful.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct MapResponse {
    pub data: HashMap<String, String>, // field 1 (map<string, string>)
}

impl Message for MapResponse {
    fn encode_raw(&self, buf: &mut impl prost::bytes::BufMut)
    where
        Self: Sized,
    {
        encoding::hash_map::encode(
            encoding::string::encode,
            encoding::string::encoded_len,
            encoding::string::encode,
            encoding::string::encoded_len,
            1,
            &self.data,
            buf,
        );
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl prost::bytes::Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        match tag {
            1 => {
                encoding::check_wire_type(WireType::LengthDelimited, wire_type)?;
                encoding::hash_map::merge(
                    encoding::string::merge,
                    encoding::string::merge,
                    &mut self.data,
                    buf,
                    ctx,
                )
            }
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::hash_map::encoded_len(
            encoding::string::encoded_len,
            encoding::string::encoded_len,
            1,
            &self.data,
        )
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}
