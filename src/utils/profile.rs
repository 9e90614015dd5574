const PROFILE_GRADIENTS: [&str; 6] = [
    "linear-gradient(135deg,#FFAB2E,#FF0022)",
    "linear-gradient(135deg,#4F46E5,#EC4899)",
    "linear-gradient(135deg,#2563EB,#06B6D4)",
    "linear-gradient(135deg,#F97316,#F43F5E)",
    "linear-gradient(135deg,#8B5CF6,#22D3EE)",
    "linear-gradient(135deg,#14B8A6,#84CC16)",
];

// 32 位元 `hash * 31 + c`，以 UTF-16 code unit 計算，與網頁端結果一致
fn hash_string(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32)
        })
}

/// Picks the avatar gradient for an account or team identifier.
pub fn profile_gradient(identifier: Option<&str>) -> &'static str {
    match identifier {
        None | Some("") => PROFILE_GRADIENTS[0],
        Some(id) => {
            let hash = (hash_string(id) as i64).abs();
            PROFILE_GRADIENTS[(hash % PROFILE_GRADIENTS.len() as i64) as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier_uses_first_gradient() {
        assert_eq!(profile_gradient(None), PROFILE_GRADIENTS[0]);
        assert_eq!(profile_gradient(Some("")), PROFILE_GRADIENTS[0]);
    }

    #[test]
    fn test_hash_matches_known_values() {
        assert_eq!(hash_string("a"), 97);
        assert_eq!(hash_string("ab"), 97 * 31 + 98);
        // "a" -> 97 % 6 == 1
        assert_eq!(profile_gradient(Some("a")), PROFILE_GRADIENTS[1]);
    }

    #[test]
    fn test_gradient_is_stable() {
        let id = "65f1c0ffee";
        assert_eq!(profile_gradient(Some(id)), profile_gradient(Some(id)));
    }
}
