//! Parse-time configuration: target dialect, preservation flags, and the
//! recognized bind-parameter styles.
//!
//! A fresh, immutable options value is consulted for the duration of one
//! parse call; there is no process-wide state. The parser reads it through
//! the pure predicates below.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use sqltrip_cst::TriviaPolicy;
use sqltrip_error::ConfigError;

/// A recognized SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    Sqlite,
    Mysql,
    Postgresql,
}

impl Dialect {
    /// Lowercase dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::Mysql),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            _ => Err(ConfigError::UnknownDialect { name: s.to_owned() }),
        }
    }
}

/// A bind-parameter placeholder style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamType {
    /// `?`
    Question,
    /// `?1`
    QuestionNumbered,
    /// `:name`
    Colon,
    /// `@name`
    AtSign,
    /// `$1` / `$name`
    Dollar,
}

impl ParamType {
    /// Placeholder shape shown in error messages.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Question => "?",
            Self::QuestionNumbered => "?N",
            Self::Colon => ":name",
            Self::AtSign => "@name",
            Self::Dollar => "$name",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// Placeholder styles each dialect's own engine accepts.
fn supported_param_types(dialect: Dialect) -> &'static [ParamType] {
    match dialect {
        Dialect::Sqlite => &[
            ParamType::Question,
            ParamType::QuestionNumbered,
            ParamType::Colon,
            ParamType::AtSign,
            ParamType::Dollar,
        ],
        Dialect::Mysql => &[ParamType::Question, ParamType::AtSign],
        Dialect::Postgresql => &[ParamType::Dollar, ParamType::Colon],
    }
}

/// Styles recognized when the caller does not choose explicitly.
fn default_param_types(dialect: Dialect) -> &'static [ParamType] {
    match dialect {
        Dialect::Sqlite => supported_param_types(Dialect::Sqlite),
        Dialect::Mysql => &[ParamType::Question],
        Dialect::Postgresql => &[ParamType::Dollar],
    }
}

/// Options for one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Which dialect's grammar productions are admitted.
    pub dialect: Dialect,
    /// Keep comments in the tree.
    pub preserve_comments: bool,
    /// Keep line breaks in the tree.
    pub preserve_newlines: bool,
    /// Keep space/tab runs in the tree.
    pub preserve_spaces: bool,
    /// Record source spans on nodes.
    pub include_ranges: bool,
    /// Recognized placeholder styles; `None` means the dialect's defaults.
    pub param_types: Option<BTreeSet<ParamType>>,
}

impl ParseOptions {
    /// Options with minimal whitespace retention (the default).
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            preserve_comments: false,
            preserve_newlines: false,
            preserve_spaces: false,
            include_ranges: false,
            param_types: None,
        }
    }

    /// Options under which rendering reproduces the input byte-for-byte.
    #[must_use]
    pub fn preserve_all(dialect: Dialect) -> Self {
        Self {
            preserve_comments: true,
            preserve_newlines: true,
            preserve_spaces: true,
            ..Self::new(dialect)
        }
    }

    /// Replace the recognized placeholder styles.
    #[must_use]
    pub fn with_param_types(mut self, types: impl IntoIterator<Item = ParamType>) -> Self {
        self.param_types = Some(types.into_iter().collect());
        self
    }

    /// Record source spans on nodes.
    #[must_use]
    pub fn with_ranges(mut self) -> Self {
        self.include_ranges = true;
        self
    }

    /// Reject invalid option combinations before any text is consumed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(types) = &self.param_types {
            for pt in types {
                if !supported_param_types(self.dialect).contains(pt) {
                    return Err(ConfigError::UnsupportedParamType {
                        dialect: self.dialect.name().to_owned(),
                        param: pt.pattern().to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether the active dialect is `dialect`.
    #[must_use]
    pub fn is_dialect(&self, dialect: Dialect) -> bool {
        self.dialect == dialect
    }

    /// Whether placeholders of style `param` are recognized.
    #[must_use]
    pub fn has_param_type(&self, param: ParamType) -> bool {
        match &self.param_types {
            Some(types) => types.contains(&param),
            None => default_param_types(self.dialect).contains(&param),
        }
    }

    /// The whitespace retention policy these options describe.
    #[must_use]
    pub fn trivia_policy(&self) -> TriviaPolicy {
        TriviaPolicy {
            comments: self.preserve_comments,
            newlines: self.preserve_newlines,
            spaces: self.preserve_spaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_parses_from_name() {
        assert_eq!("sqlite".parse::<Dialect>().ok(), Some(Dialect::Sqlite));
        assert_eq!(
            "POSTGRES".parse::<Dialect>().ok(),
            Some(Dialect::Postgresql)
        );
        assert!(matches!(
            "oracle".parse::<Dialect>(),
            Err(ConfigError::UnknownDialect { .. })
        ));
    }

    #[test]
    fn dialect_defaults_differ() {
        let sqlite = ParseOptions::new(Dialect::Sqlite);
        let mysql = ParseOptions::new(Dialect::Mysql);
        let postgres = ParseOptions::new(Dialect::Postgresql);
        assert!(sqlite.has_param_type(ParamType::Colon));
        assert!(mysql.has_param_type(ParamType::Question));
        assert!(!mysql.has_param_type(ParamType::Dollar));
        assert!(postgres.has_param_type(ParamType::Dollar));
        assert!(!postgres.has_param_type(ParamType::Question));
    }

    #[test]
    fn incompatible_param_style_is_a_config_error() {
        let opts = ParseOptions::new(Dialect::Mysql).with_param_types([ParamType::Dollar]);
        assert!(matches!(
            opts.validate(),
            Err(ConfigError::UnsupportedParamType { .. })
        ));
    }

    #[test]
    fn explicit_param_set_overrides_defaults() {
        let opts = ParseOptions::new(Dialect::Sqlite).with_param_types([ParamType::Question]);
        assert!(opts.validate().is_ok());
        assert!(opts.has_param_type(ParamType::Question));
        assert!(!opts.has_param_type(ParamType::Colon));
    }
}
