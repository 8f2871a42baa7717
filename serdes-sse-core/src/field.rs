//! Classification of a single line of the event stream.

/// Field names the decoder acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    /// `event`: sets the event type.
    Event,
    /// `data`: appends a payload line.
    Data,
    /// `id`: updates the last event ID.
    Id,
    /// `retry`: sets the reconnection delay.
    Retry,
    /// Anything else. Consumed without effect.
    Unknown,
}

impl FieldName {
    /// Classify a raw field name. Matching is case-sensitive.
    pub fn classify(name: &str) -> Self {
        match name {
            "event" => Self::Event,
            "data" => Self::Data,
            "id" => Self::Id,
            "retry" => Self::Retry,
            _ => Self::Unknown,
        }
    }
}

/// One parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldToken<'a> {
    /// Empty line: dispatch the buffered event.
    Blank,
    /// Line starting with `:`. The text after the colon is kept so callers
    /// can treat comments as keep-alives.
    Comment(&'a str),
    /// A `name: value` pair.
    Field {
        /// Text before the first colon, or the whole line when there is none.
        name: &'a str,
        /// Text after the first colon minus one leading space, or empty.
        value: &'a str,
    },
}

impl<'a> FieldToken<'a> {
    /// Parse a line whose terminator has already been stripped.
    pub fn parse(line: &'a str) -> Self {
        if line.is_empty() {
            return Self::Blank;
        }

        match line.split_once(':') {
            Some(("", comment)) => Self::Comment(comment),
            Some((name, value)) => Self::Field {
                name,
                value: value.strip_prefix(' ').unwrap_or(value),
            },
            None => Self::Field {
                name: line,
                value: "",
            },
        }
    }

    /// The recognized field name, if this token is a field.
    pub fn field_name(&self) -> Option<FieldName> {
        match self {
            Self::Field { name, .. } => Some(FieldName::classify(name)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_blank() {
        assert_eq!(FieldToken::parse(""), FieldToken::Blank);
    }

    #[rstest]
    #[case(":", "")]
    #[case(": keep-alive", " keep-alive")]
    #[case("::", ":")]
    fn test_comment(#[case] line: &str, #[case] text: &str) {
        assert_eq!(FieldToken::parse(line), FieldToken::Comment(text));
    }

    #[rstest]
    #[case::one_space("data: hello", "data", "hello")]
    #[case::no_space("data:hello", "data", "hello")]
    #[case::two_spaces("data:  hello", "data", " hello")]
    #[case::tab_kept("data:\thello", "data", "\thello")]
    #[case::trailing_space_kept("data: hello ", "data", "hello ")]
    #[case::second_colon("data: a: b", "data", "a: b")]
    #[case::empty_value("id:", "id", "")]
    #[case::space_only("id: ", "id", "")]
    #[case::no_colon("data", "data", "")]
    #[case::space_in_name("da ta: x", "da ta", "x")]
    fn test_field(#[case] line: &str, #[case] name: &str, #[case] value: &str) {
        assert_eq!(FieldToken::parse(line), FieldToken::Field { name, value });
    }

    #[test]
    fn test_field_name_classification() {
        assert_eq!(FieldToken::parse("event: x").field_name(), Some(FieldName::Event));
        assert_eq!(FieldToken::parse("data").field_name(), Some(FieldName::Data));
        assert_eq!(FieldToken::parse("id: 1").field_name(), Some(FieldName::Id));
        assert_eq!(FieldToken::parse("retry: 1").field_name(), Some(FieldName::Retry));
        assert_eq!(FieldToken::parse("Data: x").field_name(), Some(FieldName::Unknown));
        assert_eq!(FieldToken::parse(": data").field_name(), None);
        assert_eq!(FieldToken::parse("").field_name(), None);
    }
}
