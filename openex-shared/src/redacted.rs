use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for contact details and similar sensitive values that masks the
/// content in Debug/Display output while serializing the real value.
#[derive(Clone, Deserialize)]
pub struct Redacted<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{ab}redacted\u{bb}")
    }
}

impl<T: fmt::Display> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{ab}redacted\u{bb}")
    }
}

impl<T: Serialize> Serialize for Redacted<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // API responses need the real value; the wrapper only guards against
        // accidental leakage through log macros like tracing::info!("{:?}", user).
        self.0.serialize(serializer)
    }
}

impl<T> Redacted<T> {
    /// Deliberate access to the underlying value, e.g. for validation.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Redacted<T> {
    fn from(value: T) -> Self {
        Redacted(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_masked() {
        let phone = Redacted("9876543210".to_string());
        assert_eq!(format!("{:?}", phone), "\u{ab}redacted\u{bb}");
        assert_eq!(format!("{}", phone), "\u{ab}redacted\u{bb}");
        assert_eq!(phone.expose(), "9876543210");
    }

    #[test]
    fn serialization_passes_through() {
        let phone = Redacted("9876543210".to_string());
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"9876543210\"");
    }
}
