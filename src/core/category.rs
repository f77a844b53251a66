use crate::core::params::{ParamField, ParameterSet};
use std::fmt;
use std::str::FromStr;

/// A single-field search backing one convenience operation of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Major,
    Career,
    Interest,
    Ethnicity,
    Religion,
    Disability,
    State,
    Membership,
    Military,
    Sport,
    Circumstance,
    CollegeChoice,
    ZipCode,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Major,
        Category::Career,
        Category::Interest,
        Category::Ethnicity,
        Category::Religion,
        Category::Disability,
        Category::State,
        Category::Membership,
        Category::Military,
        Category::Sport,
        Category::Circumstance,
        Category::CollegeChoice,
        Category::ZipCode,
    ];

    /// The request field this category filters on
    pub fn field(self) -> ParamField {
        match self {
            Category::Major => ParamField::Major,
            Category::Career => ParamField::Career,
            Category::Interest => ParamField::Interest,
            Category::Ethnicity => ParamField::Race,
            Category::Religion => ParamField::Religion,
            Category::Disability => ParamField::Disability,
            Category::State => ParamField::State,
            Category::Membership => ParamField::Membership,
            Category::Military => ParamField::Military,
            Category::Sport => ParamField::Athletics,
            Category::Circumstance => ParamField::Circumstance,
            Category::CollegeChoice => ParamField::CollegeChoice,
            Category::ZipCode => ParamField::ZipCode,
        }
    }

    /// URL slug used by the gateway routes
    pub fn slug(self) -> &'static str {
        match self {
            Category::Major => "major",
            Category::Career => "career",
            Category::Interest => "interest",
            Category::Ethnicity => "ethnicity",
            Category::Religion => "religion",
            Category::Disability => "disability",
            Category::State => "state",
            Category::Membership => "membership",
            Category::Military => "military",
            Category::Sport => "sport",
            Category::Circumstance => "circumstance",
            Category::CollegeChoice => "college-choice",
            Category::ZipCode => "zipcode",
        }
    }

    /// Apply the joined identifiers to `base`
    ///
    /// No identifiers leaves the field at its default.
    pub fn apply<S: AsRef<str>>(self, base: &ParameterSet, ids: &[S]) -> ParameterSet {
        let joined = join_ids(ids);
        let value = if joined.is_empty() {
            self.field().default_value().to_string()
        } else {
            joined
        };
        base.clone().with(self.field(), value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scholarship category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Join identifiers the way the remote service expects list filters: `"a,b,c"`
pub fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
