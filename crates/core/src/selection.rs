//! Subject and explanation-style selection.
//!
//! The user picks one [`Subject`] and one [`Style`]; together they decide the
//! system instruction of every composed prompt. Labels coming from the outside
//! world (CLI flags, config files, chat commands) are parsed here and rejected
//! with a [`ConfigurationError`] when unknown, never silently defaulted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// The subject domain the assistant answers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Literature,
    Math,
    ComputerScience,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Literature, Subject::Math, Subject::ComputerScience];

    /// The label shown to the user and substituted into the system instruction.
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Literature => "文学",
            Subject::Math => "数学",
            Subject::ComputerScience => "计算机",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "文学" | "literature" => Ok(Subject::Literature),
            "数学" | "math" | "maths" | "mathematics" => Ok(Subject::Math),
            "计算机" | "computer-science" | "computer_science" | "cs" => {
                Ok(Subject::ComputerScience)
            }
            _ => Err(ConfigurationError::UnknownSubject(s.to_string())),
        }
    }
}

/// How much the assistant elaborates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Concise,
    Detailed,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Concise, Style::Detailed];

    pub fn label(&self) -> &'static str {
        match self {
            Style::Concise => "简洁",
            Style::Detailed => "详细",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "简洁" | "concise" => Ok(Style::Concise),
            "详细" | "detailed" => Ok(Style::Detailed),
            _ => Err(ConfigurationError::UnknownStyle(s.to_string())),
        }
    }
}

/// The user's current (subject, style) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub subject: Subject,
    pub style: Style,
}

impl Selection {
    pub fn new(subject: Subject, style: Style) -> Self {
        Self { subject, style }
    }

    /// Parse both labels, failing on the first unknown one.
    pub fn from_labels(subject: &str, style: &str) -> Result<Self, ConfigurationError> {
        Ok(Self {
            subject: subject.parse()?,
            style: style.parse()?,
        })
    }
}

impl Default for Selection {
    /// The first subject and the first style.
    fn default() -> Self {
        Self::new(Subject::Literature, Style::Concise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chinese_and_english_labels() {
        assert_eq!("数学".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!("Math".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!(" cs ".parse::<Subject>().unwrap(), Subject::ComputerScience);
        assert_eq!("详细".parse::<Style>().unwrap(), Style::Detailed);
        assert_eq!("CONCISE".parse::<Style>().unwrap(), Style::Concise);
    }

    #[test]
    fn labels_roundtrip_through_parse() {
        for subject in Subject::ALL {
            assert_eq!(subject.label().parse::<Subject>().unwrap(), subject);
        }
        for style in Style::ALL {
            assert_eq!(style.label().parse::<Style>().unwrap(), style);
        }
    }

    #[test]
    fn unknown_style_is_a_configuration_error() {
        let err = "verbose".parse::<Style>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownStyle("verbose".into()));
    }

    #[test]
    fn unknown_subject_is_a_configuration_error() {
        let err = Selection::from_labels("化学", "简洁").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownSubject(_)));
    }

    #[test]
    fn default_selection_is_first_option() {
        let selection = Selection::default();
        assert_eq!(selection.subject, Subject::Literature);
        assert_eq!(selection.style, Style::Concise);
    }
}
