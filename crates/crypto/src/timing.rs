//! Constant-time operations for security.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// A length mismatch returns early; the length of a digest is public. For
/// equal lengths every byte pair is examined, so the running time does not
/// depend on where the first difference sits.
///
/// # Arguments
/// * `a` - First byte slice
/// * `b` - Second byte slice
///
/// # Returns
/// true if slices are equal, false otherwise
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Compare two strings in constant time over their UTF-8 bytes.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    constant_time_compare(a.as_bytes(), b.as_bytes())
}
