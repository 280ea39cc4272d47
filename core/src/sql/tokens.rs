/// SQL keywords, operators and punctuation emitted by the query renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Statement keywords
    SELECT,
    DISTINCT,
    FROM,
    WHERE,
    AS,
    INNER,
    LEFT,
    JOIN,
    ON,
    ORDER,
    BY,
    ASC,
    DESC,
    LIMIT,
    OFFSET,

    // Predicates
    AND,
    OR,
    NOT,
    IS,
    NULL,
    LIKE,
    ESCAPE,

    // Comparison operators
    EQ,
    NE,
    GT,
    GE,
    LT,
    LE,

    // Arithmetic and string operators
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    CONCAT,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
}

impl Token {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::DISTINCT => "DISTINCT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::AS => "AS",
            Token::INNER => "INNER",
            Token::LEFT => "LEFT",
            Token::JOIN => "JOIN",
            Token::ON => "ON",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIKE => "LIKE",
            Token::ESCAPE => "ESCAPE",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::GT => ">",
            Token::GE => ">=",
            Token::LT => "<",
            Token::LE => "<=",
            Token::PLUS => "+",
            Token::MINUS => "-",
            Token::STAR => "*",
            Token::SLASH => "/",
            Token::PERCENT => "%",
            Token::CONCAT => "||",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
        }
    }

    /// Binary operators are always surrounded by spaces when rendered.
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ
                | Token::NE
                | Token::GT
                | Token::GE
                | Token::LT
                | Token::LE
                | Token::PLUS
                | Token::MINUS
                | Token::STAR
                | Token::SLASH
                | Token::PERCENT
                | Token::CONCAT
        )
    }

    pub const fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Token::LPAREN | Token::RPAREN | Token::COMMA | Token::DOT
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
