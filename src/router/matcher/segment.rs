use strum_macros::Display;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum Segment<'a> {
    #[strum(to_string = "static")]
    Static(&'a str),
    #[strum(to_string = "param")]
    Param(&'a str),
    #[strum(to_string = "wildcard")]
    Wildcard,
    #[strum(to_string = "multi-wildcard")]
    MultiWildcard,
}

impl<'a> Segment<'a> {
    /// Empty segments are static text equal to the empty string.
    /// `{}` is a param with an empty name.
    pub fn classify(segment: &'a str) -> Self {
        match segment {
            "*" => Segment::Wildcard,
            "**" => Segment::MultiWildcard,
            _ => match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => Segment::Param(name),
                None => Segment::Static(segment),
            },
        }
    }
}

/// Character scan, not segment aware: a `?` anywhere keeps the pattern out
/// of the exact map.
pub fn is_static_path(pattern: &str) -> bool {
    !pattern.bytes().any(|b| matches!(b, b'{' | b'*' | b'?'))
}

/// Splits on `/`. Only the trailing empty segment left by a trailing slash is
/// dropped.
pub fn segments(pattern: &str) -> impl Iterator<Item = &str> {
    pattern.split_terminator('/')
}
