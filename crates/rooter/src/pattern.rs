//! Nested glob pattern lists.

/// A glob pattern, or an arbitrarily nested list of them.
///
/// Lists are flattened depth-first, preserving order, before any pattern is
/// resolved or matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    One(String),
    Many(Vec<Pattern>),
}

impl Pattern {
    /// Flatten into an ordered list of plain pattern strings.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::One(pattern) => out.push(pattern),
            Pattern::Many(patterns) => {
                for pattern in patterns {
                    pattern.flatten_into(out);
                }
            }
        }
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::One(pattern.to_string())
    }
}

impl From<String> for Pattern {
    fn from(pattern: String) -> Self {
        Pattern::One(pattern)
    }
}

impl From<&String> for Pattern {
    fn from(pattern: &String) -> Self {
        Pattern::One(pattern.clone())
    }
}

impl<T: Into<Pattern>> From<Vec<T>> for Pattern {
    fn from(patterns: Vec<T>) -> Self {
        Pattern::Many(patterns.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Pattern>, const N: usize> From<[T; N]> for Pattern {
    fn from(patterns: [T; N]) -> Self {
        Pattern::Many(patterns.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pattern() {
        let pattern = Pattern::from("*.json");
        assert_eq!(pattern.flatten(), vec!["*.json"]);
    }

    #[test]
    fn test_nested_patterns_flatten_in_order() {
        let pattern = Pattern::Many(vec![
            "a/*".into(),
            vec![Pattern::from("b/*"), vec!["c/*", "d/*"].into()].into(),
            "e/*".into(),
        ]);
        assert_eq!(pattern.flatten(), vec!["a/*", "b/*", "c/*", "d/*", "e/*"]);
    }

    #[test]
    fn test_empty_list() {
        let pattern = Pattern::from(Vec::<String>::new());
        assert!(pattern.flatten().is_empty());
    }
}
