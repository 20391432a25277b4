//! Input sanitizing for values that arrive from untrusted transports.

/// Trims surrounding whitespace and removes NUL characters.
pub fn clean(value: &str) -> String {
    value.trim().chars().filter(|c| *c != '\0').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_trims_and_strips_nul() {
        assert_eq!(clean("  ts=1,v1=ab\0c \n"), "ts=1,v1=abc");
    }

    #[test]
    fn clean_leaves_inner_whitespace() {
        assert_eq!(clean(" a b "), "a b");
    }

    #[test]
    fn clean_of_blank_is_empty() {
        assert_eq!(clean(" \0 "), "");
    }
}
