//! Rules over text input.
//!
//! All of them classify a `String` into `bool`, `true` meaning valid.

use vigil_core::Rule;

/// Valid when the input contains at least one non-whitespace character.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmptyString;

impl Rule<String, bool> for NotEmptyString {
    fn validate(&self, input: &String) -> bool {
        !input.trim().is_empty()
    }
}

/// Valid when the number of characters lies in `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct StringLength {
    min: usize,
    max: usize,
}

impl StringLength {
    /// Accept lengths in `min..=max`.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Accept lengths of at least `min`.
    pub const fn at_least(min: usize) -> Self {
        Self::new(min, usize::MAX)
    }
}

impl Rule<String, bool> for StringLength {
    fn validate(&self, input: &String) -> bool {
        (self.min..=self.max).contains(&input.chars().count())
    }
}

/// Valid when the whole input matches a regular expression.
#[cfg(feature = "regex")]
#[derive(Debug, Clone)]
pub struct StringRegex {
    pattern: regex::Regex,
}

#[cfg(feature = "regex")]
impl StringRegex {
    /// Compile `pattern`, anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = regex::Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self { pattern })
    }
}

#[cfg(feature = "regex")]
impl Rule<String, bool> for StringRegex {
    fn validate(&self, input: &String) -> bool {
        self.pattern.is_match(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(NotEmptyString.validate(&"x".to_string()));
        assert!(!NotEmptyString.validate(&"   ".to_string()));
        assert!(!NotEmptyString.validate(&String::new()));
    }

    #[test]
    fn test_length_counts_chars() {
        let rule = StringLength::new(2, 3);
        assert!(!rule.validate(&"a".to_string()));
        assert!(rule.validate(&"éé".to_string()));
        assert!(rule.validate(&"abc".to_string()));
        assert!(!rule.validate(&"abcd".to_string()));
        assert!(StringLength::at_least(1).validate(&"long enough".to_string()));
    }

    #[cfg(feature = "regex")]
    #[test]
    fn test_regex_matches_whole_input() {
        let rule = StringRegex::new("[0-9]+").unwrap();
        assert!(rule.validate(&"123".to_string()));
        assert!(!rule.validate(&"12a".to_string()));
        assert!(StringRegex::new("(").is_err());
    }
}
