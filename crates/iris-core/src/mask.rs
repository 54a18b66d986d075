//! Deterministic masking of sensitive values.
//!
//! Masking produces the rendition of a sensitive value that observability
//! sinks receive; the raw value stays available for functional use. Three
//! pattern forms are supported:
//!
//! - `*` — the full-mask token: a constant `******` that reveals nothing,
//!   not even the value's length.
//! - `last:N` — reveal the last `N` characters, one mask character per
//!   hidden character (displayed length equals original length).
//! - a positional template mixing `{N}` (reveal `N` characters) and `*`
//!   (mask one character), e.g. `{3}*{4}` for "show first 3 and last 4".
//!   A trailing `{N}` is anchored to the end of the value, so templates
//!   apply to values longer than the template itself.

use std::fmt;
use std::str::FromStr;

/// The constant rendition of a fully masked value.
pub const FULL_MASK: &str = "******";

/// The character used to hide masked positions.
const MASK_CHAR: char = '*';

/// An error parsing a mask pattern string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mask pattern '{pattern}': {detail}")]
pub struct MaskPatternError {
    /// The pattern that failed to parse.
    pub pattern: String,
    /// What was wrong with it.
    pub detail: String,
}

impl MaskPatternError {
    fn new(pattern: &str, detail: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            detail: detail.into(),
        }
    }
}

/// One element of a positional mask template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskToken {
    /// Reveal the next `n` characters.
    Reveal(usize),
    /// Mask one character.
    Mask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MaskKind {
    Full,
    RevealLast(usize),
    Template(Vec<MaskToken>),
}

/// A parsed mask pattern.
///
/// # Example
///
/// ```rust
/// use iris_core::MaskPattern;
///
/// let pattern: MaskPattern = "last:4".parse().unwrap();
/// assert_eq!(pattern.apply("4111111111111111"), "************1111");
///
/// let template: MaskPattern = "{3}*{4}".parse().unwrap();
/// assert_eq!(template.apply("378282246310005"), "378********0005");
///
/// let full: MaskPattern = "*".parse().unwrap();
/// assert_eq!(full.apply("anything at all"), "******");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPattern {
    kind: MaskKind,
}

impl MaskPattern {
    /// Returns the full-mask pattern.
    #[must_use]
    pub fn full() -> Self {
        Self {
            kind: MaskKind::Full,
        }
    }

    /// Returns a pattern revealing the last `n` characters.
    #[must_use]
    pub fn reveal_last(n: usize) -> Self {
        Self {
            kind: MaskKind::RevealLast(n),
        }
    }

    /// Applies the pattern to a raw value.
    ///
    /// Application never fails: a value too short for its pattern is
    /// masked entirely rather than partially revealed.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        match &self.kind {
            MaskKind::Full => FULL_MASK.to_string(),
            MaskKind::RevealLast(n) => Self::apply_reveal_last(raw, *n),
            MaskKind::Template(tokens) => Self::apply_template(raw, tokens),
        }
    }

    fn apply_reveal_last(raw: &str, reveal: usize) -> String {
        let chars: Vec<char> = raw.chars().collect();
        // A value no longer than the reveal window would be shown whole;
        // mask it entirely instead.
        if chars.len() <= reveal {
            return MASK_CHAR.to_string().repeat(chars.len());
        }
        let hidden = chars.len() - reveal;
        let mut out = MASK_CHAR.to_string().repeat(hidden);
        out.extend(&chars[hidden..]);
        out
    }

    fn apply_template(raw: &str, tokens: &[MaskToken]) -> String {
        let chars: Vec<char> = raw.chars().collect();
        let mut out = String::with_capacity(chars.len());
        let mut position = 0usize;

        for (index, token) in tokens.iter().enumerate() {
            if position >= chars.len() {
                break;
            }
            match token {
                MaskToken::Mask => {
                    out.push(MASK_CHAR);
                    position += 1;
                }
                MaskToken::Reveal(n) => {
                    let is_last = index == tokens.len() - 1;
                    if is_last && chars.len() >= position + *n {
                        // Anchor the final reveal to the end of the value.
                        let start = chars.len() - *n;
                        while position < start {
                            out.push(MASK_CHAR);
                            position += 1;
                        }
                        out.extend(&chars[start..]);
                        position = chars.len();
                    } else {
                        let end = (position + *n).min(chars.len());
                        out.extend(&chars[position..end]);
                        position = end;
                    }
                }
            }
        }

        // Anything the template did not account for stays hidden.
        while position < chars.len() {
            out.push(MASK_CHAR);
            position += 1;
        }

        out
    }

    fn parse_template(pattern: &str) -> Result<Vec<MaskToken>, MaskPatternError> {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars();

        while let Some(c) = chars.next() {
            match c {
                '*' => tokens.push(MaskToken::Mask),
                '{' => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(other) => {
                                return Err(MaskPatternError::new(
                                    pattern,
                                    format!("unexpected '{other}' inside {{N}}"),
                                ));
                            }
                            None => {
                                return Err(MaskPatternError::new(pattern, "unterminated '{'"));
                            }
                        }
                    }
                    let n: usize = digits
                        .parse()
                        .map_err(|_| MaskPatternError::new(pattern, "empty or oversized {N}"))?;
                    tokens.push(MaskToken::Reveal(n));
                }
                other => {
                    return Err(MaskPatternError::new(
                        pattern,
                        format!("unexpected character '{other}'"),
                    ));
                }
            }
        }

        if tokens.is_empty() {
            return Err(MaskPatternError::new(pattern, "empty pattern"));
        }

        Ok(tokens)
    }
}

impl FromStr for MaskPattern {
    type Err = MaskPatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        if pattern == "*" {
            return Ok(Self::full());
        }
        if let Some(n) = pattern.strip_prefix("last:") {
            let n: usize = n
                .parse()
                .map_err(|_| MaskPatternError::new(pattern, "expected last:N with numeric N"))?;
            return Ok(Self::reveal_last(n));
        }
        Ok(Self {
            kind: MaskKind::Template(Self::parse_template(pattern)?),
        })
    }
}

impl fmt::Display for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MaskKind::Full => f.write_str("*"),
            MaskKind::RevealLast(n) => write!(f, "last:{n}"),
            MaskKind::Template(tokens) => {
                for token in tokens {
                    match token {
                        MaskToken::Mask => f.write_str("*")?,
                        MaskToken::Reveal(n) => write!(f, "{{{n}}}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
