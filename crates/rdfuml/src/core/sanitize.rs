//! Diagram identifier sanitizing
//!
//! Graphviz identifiers may not contain most URI punctuation, so qnames are
//! mapped onto a restricted alphabet before they are used as node ids.
//!
//! Two distinct qnames can collide after sanitizing (`ex:a-b` and `ex:a_b`
//! both become `ex_a_b`). Collisions are not detected; the second node
//! silently shares the first one's identifier.

/// Characters replaced by `_` in diagram identifiers
const REPLACED: [char; 5] = ['.', '/', ':', '-', '#'];

/// Map a qname (or any raw name) onto a safe diagram identifier
///
/// # Example
/// ```
/// use rdfuml::core::sanitize;
///
/// assert_eq!(sanitize("ex:Person-Name"), "ex_Person_Name");
/// ```
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if REPLACED.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_listed_character() {
        assert_eq!(sanitize("a.b/c:d-e#f"), "a_b_c_d_e_f");
    }

    #[test]
    fn test_qname_example() {
        assert_eq!(sanitize("ex:Person-Name"), "ex_Person_Name");
    }

    #[test]
    fn test_full_uri() {
        assert_eq!(
            sanitize("http://example.org/ns#Thing"),
            "http___example_org_ns_Thing"
        );
    }

    #[test]
    fn test_other_characters_pass_through() {
        assert_eq!(sanitize("Ünïcode_name42"), "Ünïcode_name42");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_known_collision_is_not_resolved() {
        assert_eq!(sanitize("ex:a-b"), sanitize("ex:a_b"));
    }
}
