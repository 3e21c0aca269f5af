//! Protocol methods and the `Allow` bitmask.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Request methods understood by the protocol.
///
/// The discriminant is the method code sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Head = 0,
    Get = 1,
    Post = 2,
    Put = 3,
    Patch = 4,
    Delete = 5,
    Options = 6,
    /// Protocol extension: locate the storage chunks of a resource.
    Locate = 7,
    /// Protocol extension: define resource headers.
    Define = 8,
}

impl Method {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Methods this client can complete; everything else is a write.
    pub fn is_readable(self) -> bool {
        matches!(self, Method::Head | Method::Get | Method::Options)
    }
}

/// Bit assignments used to decode a resource's method bitmask into `Allow`.
///
/// The order is the order names appear in the header.
pub const ALLOW_TABLE: &[(u16, Method)] = &[
    (1 << 0, Method::Head),
    (1 << 1, Method::Get),
    (1 << 2, Method::Put),
    (1 << 3, Method::Delete),
    (1 << 4, Method::Patch),
    (1 << 5, Method::Options),
    (1 << 6, Method::Locate),
    (1 << 7, Method::Define),
];

/// Decodes a method bitmask into the list of allowed methods.
pub fn allowed_methods(mask: u16) -> Vec<Method> {
    ALLOW_TABLE
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, method)| *method)
        .collect()
}
