
/// How a rule combines its conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// `anyof (...)`: at least one condition holds
    #[default]
    AnyOf,
    /// `allof (...)`: every condition holds
    AllOf,
}

impl MatchKind {
    /// The Sieve keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            MatchKind::AnyOf => "anyof",
            MatchKind::AllOf => "allof",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("anyof") {
            Some(MatchKind::AnyOf)
        } else if keyword.eq_ignore_ascii_case("allof") {
            Some(MatchKind::AllOf)
        } else {
            None
        }
    }
}

/// Comparison used by a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchType {
    #[default]
    Contains,
    Is,
    Matches,
    Regex,
}

impl MatchType {
    pub const ALL: [MatchType; 4] = [
        MatchType::Contains,
        MatchType::Is,
        MatchType::Matches,
        MatchType::Regex,
    ];

    /// Tag name without the leading colon.
    pub fn tag(self) -> &'static str {
        match self {
            MatchType::Contains => "contains",
            MatchType::Is => "is",
            MatchType::Matches => "matches",
            MatchType::Regex => "regex",
        }
    }

    /// Case-insensitive lookup by tag name, colon omitted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.tag().eq_ignore_ascii_case(tag))
    }
}

/// One `header` or `address` test.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Header field name, e.g. `from`
    pub header: String,
    pub match_type: MatchType,
    /// Key the header is compared against
    pub value: String,
    /// `address` test instead of `header`
    pub address_test: bool,
    /// Wrapped in a single `not`
    pub negate: bool,
}

impl Condition {
    /// A `header` test.
    pub fn header(
        header: impl Into<String>,
        match_type: MatchType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            header: header.into(),
            match_type,
            value: value.into(),
            address_test: false,
            negate: false,
        }
    }

    /// An `address` test.
    pub fn address(
        header: impl Into<String>,
        match_type: MatchType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            address_test: true,
            ..Self::header(header, match_type, value)
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// A rule action. The set is closed: anything else stays in a raw block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    FileInto { folder: String },
    FileIntoCopy { folder: String },
    Redirect { address: String },
    Keep,
    Discard,
    Stop,
    AddFlag { flag: String },
    Reject { message: String },
}

impl Action {
    /// Sieve command name.
    pub fn command(&self) -> &'static str {
        match self {
            Action::FileInto { .. } | Action::FileIntoCopy { .. } => "fileinto",
            Action::Redirect { .. } => "redirect",
            Action::Keep => "keep",
            Action::Discard => "discard",
            Action::Stop => "stop",
            Action::AddFlag { .. } => "addflag",
            Action::Reject { .. } => "reject",
        }
    }

    /// The single string argument, if the action takes one.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Action::FileInto { folder } | Action::FileIntoCopy { folder } => Some(folder),
            Action::Redirect { address } => Some(address),
            Action::AddFlag { flag } => Some(flag),
            Action::Reject { message } => Some(message),
            Action::Keep | Action::Discard | Action::Stop => None,
        }
    }
}

/// A modeled `if` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Handle the UI addresses the rule by. Travels with the JSON document
    /// only; script text has nowhere to keep it.
    pub id: Option<String>,
    /// Taken from the comment line directly above the rule
    pub name: Option<String>,
    pub enabled: bool,
    pub match_kind: MatchKind,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

impl Rule {
    /// An enabled, unnamed rule with no conditions or actions.
    pub fn new(match_kind: MatchKind) -> Self {
        Self {
            id: None,
            name: None,
            enabled: true,
            match_kind,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new(MatchKind::default())
    }
}

/// Script text the model does not interpret, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawBlock {
    text: String,
}

impl RawBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
