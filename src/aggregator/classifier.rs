//! Built-in grouping keys for aggregation.
//!
//! The aggregation engine accepts any `Fn(&Span) -> String`; these are the
//! strategies the CLI exposes.

use crate::parser::schema::Span;

/// How spans are labelled for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// `"{name} ({category})"`
    #[default]
    NameAndCategory,
    Name,
    Category,
}

impl std::str::FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name-and-category" | "name_and_category" | "full" => Ok(Self::NameAndCategory),
            "name" => Ok(Self::Name),
            "category" | "type" | "kind" => Ok(Self::Category),
            other => Err(format!(
                "unknown key strategy '{}' (expected name-and-category, name or category)",
                other
            )),
        }
    }
}

impl KeyStrategy {
    pub fn key_of(&self, span: &Span) -> String {
        match self {
            Self::NameAndCategory => format!("{} ({})", span.name, span.category),
            Self::Name => span.name.clone(),
            Self::Category => span.category.clone(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameAndCategory => "name-and-category",
            Self::Name => "name",
            Self::Category => "category",
        }
    }
}
