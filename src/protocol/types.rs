//! Wire-level protocol structures.
//!
//! These mirror what a Chain Adapter sends and receives: the request struct
//! built per call and the compact HEAD/GET result blocks (fixed-width strings,
//! bitmasks and numeric cache directives).

use std::fmt;

use super::method::Method;

/// A NUL-padded fixed-width string field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize>([u8; N]);

impl<const N: usize> FixedString<N> {
    pub const EMPTY: Self = Self([0u8; N]);

    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Builds a field from text, truncating to `N` bytes and padding with NULs.
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [0u8; N];
        let len = text.len().min(N);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Text content with NUL padding and surrounding whitespace removed.
    pub fn trimmed(&self) -> String {
        String::from_utf8_lossy(&self.0)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedString<{}>({:?})", N, self.trimmed())
    }
}

/// 32-byte fixed-width text, the width used by resource metadata fields.
pub type Bytes32 = FixedString<32>;

/// The protocol's entity tag: an opaque 32-byte value.
///
/// The all-zero value is a sentinel meaning "no tag".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentTag([u8; 32]);

impl ContentTag {
    pub const ZERO: ContentTag = ContentTag([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Parses `0x`-prefixed 64-digit hex.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"))?;
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }

    /// Extracts a tag from an `If-None-Match` value.
    ///
    /// Accepts quoted or bare tags, weak (`W/`) tags and lists (first entry
    /// wins). Anything unrecognized yields the zero sentinel.
    pub fn from_if_none_match(value: &str) -> Self {
        let first = value.split(',').next().unwrap_or("").trim();
        let first = first.strip_prefix("W/").unwrap_or(first);
        let first = first.trim_matches('"');
        Self::parse_hex(first).unwrap_or(Self::ZERO)
    }
}

impl fmt::Display for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentTag({self})")
    }
}

/// Byte range bounds. `(0, 0)` means the whole resource.
///
/// A negative start counts back from the end of the resource; an end of 0
/// means "through the last byte".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    pub start: i64,
    pub end: i64,
}

impl ByteRange {
    pub const WHOLE: ByteRange = ByteRange { start: 0, end: 0 };

    pub fn is_whole(&self) -> bool {
        *self == Self::WHOLE
    }
}

/// The native request structure sent to a host or gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRequest {
    pub protocol_version: String,
    pub path: String,
    pub method: Method,
    /// Epoch seconds, 0 when unconditional.
    pub if_modified_since: u64,
    /// Zero when unconditional.
    pub if_none_match: ContentTag,
    pub range: ByteRange,
}

impl ProtocolRequest {
    pub fn method_code(&self) -> u8 {
        self.method.code()
    }
}

/// Cache directives carried by a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheControl {
    /// Seconds, 0 when unset.
    pub max_age: u32,
    pub s_max_age: u32,
    pub no_store: bool,
    pub no_cache: bool,
    pub immutable: bool,
    pub public: bool,
    pub must_revalidate: bool,
    pub stale_while_revalidate: u32,
    pub stale_if_error: u32,
}

/// Redirect sub-structure of a HEAD result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedirectInfo {
    pub code: u16,
    pub location: String,
}

/// Resource metadata with fixed-width text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceMetadata {
    pub mime_type: Bytes32,
    pub charset: Bytes32,
    pub encoding: Bytes32,
    pub language: Bytes32,
    pub size: u64,
    pub version: u64,
    /// Epoch seconds, 0 when unknown.
    pub last_modified: u64,
}

/// Result of a HEAD call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadResult {
    pub status: u16,
    /// Supported methods, decoded into `Allow`.
    pub methods: u16,
    pub cache: CacheControl,
    pub redirect: RedirectInfo,
    pub metadata: ResourceMetadata,
    pub etag: ContentTag,
}

/// Result of a GET call: the head block plus the raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetResult {
    pub head: HeadResult,
    pub data: Vec<u8>,
}
