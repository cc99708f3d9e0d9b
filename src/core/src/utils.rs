//! Small helpers shared across crates. Nothing here is domain logic —
//! storage, auth, and query each own their own types and math.

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn timestamp_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_id_is_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn timestamp_now_is_positive() {
        assert!(timestamp_now() > 0);
    }
}
