use compact_str::CompactString;
use core::fmt::Write;
use std::borrow::Cow;

use crate::sql::tokens::Token;
use crate::value::Value;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - Quoted identifiers ("table_name", "alias")
/// - `Raw` - Unquoted raw SQL text (function names, type names)
/// - `Text` - Inline string literal ('YYYY-MM-DD')
/// - `Number` - Inline integer literal (LIMIT 10)
/// - `Param` - Bound parameter value, rendered as a placeholder
/// - `Column` - Qualified column reference ("t0"."name")
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// Renders as: keyword with automatic spacing rules
    Token(Token),

    /// Renders as: "name" (with quotes)
    Ident(CompactString),

    /// Renders as: text (no quotes, as-is)
    Raw(Cow<'static, str>),

    /// Renders as: 'text' with embedded quotes doubled
    Text(CompactString),

    Number(i64),

    /// Renders as: ? or $n depending on the dialect
    Param(Value),

    /// Renders as: "qualifier"."name"
    Column {
        qualifier: CompactString,
        name: CompactString,
    },
}

impl SQLChunk {
    #[inline]
    pub const fn token(t: Token) -> Self {
        Self::Token(t)
    }

    #[inline]
    pub const fn raw_static(text: &'static str) -> Self {
        Self::Raw(Cow::Borrowed(text))
    }

    #[inline]
    pub fn ident(name: impl Into<CompactString>) -> Self {
        Self::Ident(name.into())
    }

    #[inline]
    pub fn column(qualifier: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self::Column {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    /// Write chunk content to buffer. Parameters are handled by the caller
    /// since their rendering depends on the running placeholder index.
    pub(crate) fn write(&self, buf: &mut impl Write) {
        match self {
            SQLChunk::Token(token) => {
                let _ = buf.write_str(token.as_str());
            }
            SQLChunk::Ident(name) => write_quoted_ident(buf, name),
            SQLChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SQLChunk::Text(text) => {
                let _ = buf.write_char('\'');
                for c in text.chars() {
                    if c == '\'' {
                        let _ = buf.write_char('\'');
                    }
                    let _ = buf.write_char(c);
                }
                let _ = buf.write_char('\'');
            }
            SQLChunk::Number(n) => {
                let _ = write!(buf, "{n}");
            }
            SQLChunk::Param(_) => {
                let _ = buf.write_char('?');
            }
            SQLChunk::Column { qualifier, name } => {
                write_quoted_ident(buf, qualifier);
                let _ = buf.write_char('.');
                write_quoted_ident(buf, name);
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(t) => !t.is_punctuation() && !t.is_operator(),
            SQLChunk::Ident(_)
            | SQLChunk::Raw(_)
            | SQLChunk::Text(_)
            | SQLChunk::Number(_)
            | SQLChunk::Param(_)
            | SQLChunk::Column { .. } => true,
        }
    }
}

fn write_quoted_ident(buf: &mut impl Write, name: &str) {
    let _ = buf.write_char('"');
    for c in name.chars() {
        if c == '"' {
            let _ = buf.write_char('"');
        }
        let _ = buf.write_char(c);
    }
    let _ = buf.write_char('"');
}

// ==================== From implementations ====================

impl From<Token> for SQLChunk {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

impl From<Value> for SQLChunk {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Param(value)
    }
}
