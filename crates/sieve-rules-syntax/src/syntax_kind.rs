//! SyntaxKind enum for all tokens and nodes in the Sieve CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Sieve CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// `#` comment running to end of line
    COMMENT,
    /// `/* ... */` comment, possibly spanning lines
    BLOCK_COMMENT,
    /// Double-quoted string literal, quotes included
    STRING,
    /// `text:` multi-line string literal, terminator line included
    MULTILINE_STRING,
    /// Number with optional `K`/`M`/`G` quantifier
    NUMBER,
    /// Bare keyword or identifier (`if`, `header`, `fileinto`, ...)
    IDENT,
    /// Colon-tagged qualifier (`:contains`, `:copy`, ...)
    TAG,
    /// `{`
    L_BRACE,
    /// `}`
    R_BRACE,
    /// `(`
    L_PAREN,
    /// `)`
    R_PAREN,
    /// `[`
    L_BRACKET,
    /// `]`
    R_BRACKET,
    /// `,`
    COMMA,
    /// `;`
    SEMICOLON,
    /// Bytes the lexer has no rule for
    UNKNOWN,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root script node
    ROOT,
    /// `require` statement
    REQUIRE,
    /// `[ "a", "b" ]` string list
    STRING_LIST,
    /// A classified `if` block the rule model can represent
    RULE,
    /// A classified rule wrapped in the disabled comment convention
    DISABLED_RULE,
    /// Comment line naming the following rule
    RULE_NAME,
    /// `anyof (...)` / `allof (...)`
    TEST_LIST,
    /// `not <test>`
    NOT_TEST,
    /// `header` / `address` leaf test
    TEST,
    /// `{ ... }` action block
    BLOCK,
    /// Single action statement
    ACTION,
    /// Verbatim span the recognizer declined to model
    RAW_BLOCK,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    ///
    /// Comments are not trivia: inside an `if` block they make the block
    /// unsupported.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for both comment flavours.
    pub fn is_comment(self) -> bool {
        matches!(self, Self::COMMENT | Self::BLOCK_COMMENT)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SieveLang {}

impl rowan::Language for SieveLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::RAW_BLOCK as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<SieveLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<SieveLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<SieveLang>;
