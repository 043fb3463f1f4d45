//! Small pure helpers shared by the editor, forms and export

use std::sync::LazyLock;

use rand::Rng;
use regex_lite::Regex;
use serde::{Deserialize, Deserializer};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern compiles"));

/// Generate a section id: epoch milliseconds followed by a random base-36 suffix.
///
/// Collisions are not detected.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", millis, suffix)
}

/// Move the element at `from` to position `to`, keeping the relative order
/// of everything else.
///
/// Out-of-range indices leave the sequence unchanged.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() {
        tracing::warn!(
            "Ignoring reorder {} -> {} on sequence of length {}",
            from,
            to,
            items.len()
        );
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Loose email plausibility check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Loose phone plausibility check; spaces, dashes and parentheses are ignored
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&digits)
}

/// Read `null` as the field's default, the same as a missing key
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert!(id.len() > ID_SUFFIX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!id.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_reorder_moves_forward() {
        let mut items = vec!["A", "B", "C"];
        reorder(&mut items, 0, 2);
        assert_eq!(items, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_reorder_moves_backward() {
        let mut items = vec![1, 2, 3, 4];
        reorder(&mut items, 3, 1);
        assert_eq!(items, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_reorder_preserves_multiset() {
        let original = vec![5, 1, 5, 3, 9, 1];
        for from in 0..original.len() {
            for to in 0..original.len() {
                let mut items = original.clone();
                reorder(&mut items, from, to);
                assert_eq!(items.len(), original.len());
                let mut a = items.clone();
                let mut b = original.clone();
                a.sort();
                b.sort();
                assert_eq!(a, b);
                assert_eq!(items[to], original[from]);
            }
        }
    }

    #[test]
    fn test_reorder_adjacent_swap_restores() {
        let original = vec!['a', 'b', 'c', 'd'];
        for i in 0..original.len() - 1 {
            let mut items = original.clone();
            reorder(&mut items, i, i + 1);
            reorder(&mut items, i + 1, i);
            assert_eq!(items, original);
        }
    }

    #[test]
    fn test_reorder_out_of_range_is_ignored() {
        let mut items = vec![1, 2];
        reorder(&mut items, 5, 0);
        reorder(&mut items, 0, 2);
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_email_check() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_check() {
        assert!(is_valid_phone("+7 (912) 345-67-89"));
        assert!(is_valid_phone("5551234"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone(""));
    }
}
