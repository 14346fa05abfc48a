//! Session module - identifiers for ingestion sessions

use std::fmt;

/// Unique identifier for an ingestion session based on UUIDv7
///
/// Every [`ResultRecord`](crate::ResultRecord) is stamped with the id of the
/// session that created it, so log lines and serialized records from the
/// same run can be correlated. UUIDv7 keeps ids chronologically sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u128);

impl SessionId {
    /// Generate a new UUIDv7-based SessionId
    ///
    /// # Examples
    ///
    /// ```
    /// use chemlog_domain::SessionId;
    ///
    /// let id = SessionId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_chronological() {
        let first = SessionId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = SessionId::new();

        assert!(first < second);
    }

    #[test]
    fn test_display_is_hyphenated_uuid_v7() {
        let id = SessionId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);

        let parsed = uuid::Uuid::parse_str(&text).unwrap();
        assert_eq!(parsed.as_u128(), id.value());
        assert_eq!(parsed.get_version_num(), 7);
    }
}
