//! 4-byte OSType tag type.

use std::fmt;

/// A 4-byte ASCII type/key discriminator, used pervasively by the descriptor and
/// extra-data grammars (`"Objc"`, `"long"`, `"8BIM"`, …).
///
/// Comparison is exact and case-sensitive; tags shorter than four characters are
/// space-padded in the format itself (`"hue "` and `"hue2"` are distinct tags),
/// so no trimming or normalization is ever applied.
///
/// # Examples
///
/// ```rust
/// use psdscope::OsType;
///
/// let key = OsType::new(*b"long");
/// assert_eq!(key, *b"long");
/// assert_eq!(key.to_string(), "long");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct OsType([u8; 4]);

impl OsType {
    /// Create an [`OsType`] from its 4 raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        OsType(bytes)
    }

    /// The raw bytes of the tag.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl PartialEq<[u8; 4]> for OsType {
    fn eq(&self, other: &[u8; 4]) -> bool {
        self.0 == *other
    }
}

impl From<[u8; 4]> for OsType {
    fn from(bytes: [u8; 4]) -> Self {
        OsType(bytes)
    }
}

impl fmt::Display for OsType {
    /// Printable ASCII bytes render as themselves, anything else as `.`,
    /// so corrupt tags stay legible in diagnostics and XML output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b == b' ' || b.is_ascii_graphic() {
                char::from(b)
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OsType('{self}')")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_printable() {
        assert_eq!(OsType::new(*b"Objc").to_string(), "Objc");
        assert_eq!(OsType::new(*b"hue ").to_string(), "hue ");
    }

    #[test]
    fn display_masks_binary() {
        assert_eq!(OsType::new([0x00, b'a', 0xff, b'b']).to_string(), ".a.b");
    }

    #[test]
    fn padded_keys_are_distinct() {
        assert_ne!(OsType::new(*b"hue "), OsType::new(*b"hue2"));
    }
}
