use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A stored value together with its optional expiration time
///
/// `expires_at` of `None` means the entry never expires via TTL. An entry
/// whose deadline has passed is logically absent even while it is still
/// physically present in the map, until a lazy check or a sweep reclaims it.
#[derive(Debug, Clone)]
pub struct Entry {
    value: Arc<Value>,
    expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry with the given value and expiration time
    pub fn new(value: Arc<Value>, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Returns a reference to the stored value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns a shared reference to the stored value (zero-cost clone)
    pub fn value_shared(&self) -> Arc<Value> {
        Arc::clone(&self.value)
    }

    /// Returns the expiration time, if any
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Checks if this entry has expired
    ///
    /// Entries without an expiration time never expire. The deadline itself
    /// still counts as live; only strictly past deadlines are expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() > deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_entry_not_expired() {
        let entry = Entry::new(
            Arc::new(json!("test_value")),
            Some(Instant::now() + Duration::from_secs(60)),
        );

        assert_eq!(entry.value(), &json!("test_value"));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expired() {
        let entry = Entry::new(
            Arc::new(json!("test_value")),
            Some(Instant::now() - Duration::from_secs(1)),
        );

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_without_deadline_never_expires() {
        let entry = Entry::new(Arc::new(json!([1, 2, 3])), None);

        assert!(!entry.is_expired());
        assert_eq!(entry.expires_at(), None);
    }

    #[test]
    fn test_value_shared_returns_arc() {
        let entry = Entry::new(
            Arc::new(json!({ "shared": true })),
            Some(Instant::now() + Duration::from_secs(60)),
        );

        let shared1 = entry.value_shared();
        let shared2 = entry.value_shared();
        // Both should point to the same allocation
        assert!(Arc::ptr_eq(&shared1, &shared2));
        assert_eq!(&*shared1, &json!({ "shared": true }));
    }
}
