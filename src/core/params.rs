use crate::config::Credentials;
use std::fmt;
use std::str::FromStr;

/// Number of fields in a [`ParameterSet`]
pub const FIELD_COUNT: usize = 37;

/// Name of the award identifier argument sent to `getdetails`
pub const DETAILS_UUID_ARG: &str = "s_uuid";

/// A named field of the `findmatches` request record
///
/// Variant order is the positional order of the remote operation's arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamField {
    ReturnFormat,
    ApiKey,
    SiteUrl,
    SiteId,
    SearchRange,
    UserId,
    UserType,
    RestrictType,
    NeedType,
    ParentType,
    Sex,
    Citizen,
    Age,
    DobMonth,
    DobDay,
    DobYear,
    ZipCode,
    Gpa,
    SatVerbal,
    SatMath,
    SatWriting,
    Act,
    MaxIncome,
    ClassRank,
    GradYear,
    Major,
    Career,
    Interest,
    Race,
    Religion,
    Disability,
    State,
    Membership,
    Military,
    Athletics,
    Circumstance,
    CollegeChoice,
}

impl ParamField {
    /// All fields in wire order
    pub const ALL: [ParamField; FIELD_COUNT] = [
        ParamField::ReturnFormat,
        ParamField::ApiKey,
        ParamField::SiteUrl,
        ParamField::SiteId,
        ParamField::SearchRange,
        ParamField::UserId,
        ParamField::UserType,
        ParamField::RestrictType,
        ParamField::NeedType,
        ParamField::ParentType,
        ParamField::Sex,
        ParamField::Citizen,
        ParamField::Age,
        ParamField::DobMonth,
        ParamField::DobDay,
        ParamField::DobYear,
        ParamField::ZipCode,
        ParamField::Gpa,
        ParamField::SatVerbal,
        ParamField::SatMath,
        ParamField::SatWriting,
        ParamField::Act,
        ParamField::MaxIncome,
        ParamField::ClassRank,
        ParamField::GradYear,
        ParamField::Major,
        ParamField::Career,
        ParamField::Interest,
        ParamField::Race,
        ParamField::Religion,
        ParamField::Disability,
        ParamField::State,
        ParamField::Membership,
        ParamField::Military,
        ParamField::Athletics,
        ParamField::Circumstance,
        ParamField::CollegeChoice,
    ];

    /// Authentication fields, always taken from configuration
    pub const AUTHENTICATION: [ParamField; 4] = [
        ParamField::ReturnFormat,
        ParamField::ApiKey,
        ParamField::SiteUrl,
        ParamField::SiteId,
    ];

    /// Wire name of the field
    pub fn name(self) -> &'static str {
        match self {
            ParamField::ReturnFormat => "returnf",
            ParamField::ApiKey => "apikey",
            ParamField::SiteUrl => "siteurl",
            ParamField::SiteId => "siteid",
            ParamField::SearchRange => "searchrange",
            ParamField::UserId => "userid",
            ParamField::UserType => "usertype",
            ParamField::RestrictType => "restricttype",
            ParamField::NeedType => "needtype",
            ParamField::ParentType => "parenttype",
            ParamField::Sex => "sex",
            ParamField::Citizen => "citizen",
            ParamField::Age => "age",
            ParamField::DobMonth => "dobmonth",
            ParamField::DobDay => "dobday",
            ParamField::DobYear => "dobyear",
            ParamField::ZipCode => "zipcode",
            ParamField::Gpa => "gpa",
            ParamField::SatVerbal => "satv",
            ParamField::SatMath => "satm",
            ParamField::SatWriting => "satw",
            ParamField::Act => "act",
            ParamField::MaxIncome => "maxincome",
            ParamField::ClassRank => "classrank",
            ParamField::GradYear => "gradyear",
            ParamField::Major => "major",
            ParamField::Career => "career",
            ParamField::Interest => "interest",
            ParamField::Race => "race",
            ParamField::Religion => "religion",
            ParamField::Disability => "disability",
            ParamField::State => "state",
            ParamField::Membership => "membership",
            ParamField::Military => "military",
            ParamField::Athletics => "athletics",
            ParamField::Circumstance => "circumstance",
            ParamField::CollegeChoice => "collegechoice",
        }
    }

    /// Value sent when nothing overrides the field
    ///
    /// `sex` and `citizen` use "1", the service's "any" code.
    pub fn default_value(self) -> &'static str {
        match self {
            ParamField::ReturnFormat
            | ParamField::ApiKey
            | ParamField::SiteUrl
            | ParamField::SiteId
            | ParamField::Major
            | ParamField::Career
            | ParamField::Interest
            | ParamField::Race
            | ParamField::Religion
            | ParamField::Disability
            | ParamField::State
            | ParamField::Membership
            | ParamField::Military
            | ParamField::Athletics
            | ParamField::Circumstance
            | ParamField::CollegeChoice => "",
            ParamField::Sex | ParamField::Citizen => "1",
            _ => "0",
        }
    }

    pub fn is_authentication(self) -> bool {
        Self::AUTHENTICATION.contains(&self)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown field name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for ParamField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// One positional argument of a remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: &'static str,
    pub value: String,
}

impl Argument {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// The request record sent to `findmatches`
///
/// Values are stored in wire order, so flattening is a plain walk over the array.
/// Every operation returns a new set; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    values: [String; FIELD_COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ParameterSet {
    /// The default record, with empty authentication fields
    pub fn defaults() -> Self {
        Self {
            values: ParamField::ALL.map(|field| field.default_value().to_string()),
        }
    }

    pub fn get(&self, field: ParamField) -> &str {
        &self.values[field.index()]
    }

    /// Return a copy with a single field replaced
    pub fn with(mut self, field: ParamField, value: impl Into<String>) -> Self {
        self.values[field.index()] = value.into();
        self
    }

    /// Shallow merge: each override replaces the matching field, later entries win
    pub fn with_overrides<I, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (ParamField, V)>,
        V: Into<String>,
    {
        overrides
            .into_iter()
            .fold(self.clone(), |set, (field, value)| set.with(field, value))
    }

    /// Force the authentication fields to the configured values
    pub fn inject_authentication(&self, credentials: &Credentials) -> Self {
        self.with_overrides([
            (ParamField::ReturnFormat, credentials.return_format()),
            (ParamField::ApiKey, credentials.api_key()),
            (ParamField::SiteUrl, credentials.site_url()),
            (ParamField::SiteId, credentials.site_id()),
        ])
    }

    /// Iterate `(field, value)` pairs in wire order
    pub fn iter(&self) -> impl Iterator<Item = (ParamField, &str)> {
        ParamField::ALL
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Positional values in wire order
    pub fn flatten(&self) -> Vec<String> {
        self.values.to_vec()
    }

    /// Positional values paired with their field names
    pub fn arguments(&self) -> Vec<Argument> {
        self.iter()
            .map(|(field, value)| Argument::new(field.name(), value))
            .collect()
    }

    /// Arguments for `getdetails`: the four authentication fields, `userid`, then `s_uuid`
    pub fn details_arguments(&self, uuid: &str) -> Vec<Argument> {
        let mut args: Vec<Argument> = ParamField::AUTHENTICATION
            .iter()
            .chain(std::iter::once(&ParamField::UserId))
            .map(|field| Argument::new(field.name(), self.get(*field)))
            .collect();
        args.push(Argument::new(DETAILS_UUID_ARG, uuid));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_index() {
        for (i, field) in ParamField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "{} out of order", field);
        }
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in ParamField::ALL {
            assert_eq!(field.name().parse::<ParamField>().unwrap(), field);
        }
        assert!("s_uuid".parse::<ParamField>().is_err());
    }

    #[test]
    fn test_defaults() {
        let set = ParameterSet::defaults();
        assert_eq!(set.get(ParamField::ApiKey), "");
        assert_eq!(set.get(ParamField::UserId), "0");
        assert_eq!(set.get(ParamField::Sex), "1");
        assert_eq!(set.get(ParamField::Citizen), "1");
        assert_eq!(set.get(ParamField::Gpa), "0");
        assert_eq!(set.get(ParamField::CollegeChoice), "");
        assert_eq!(set.flatten().len(), FIELD_COUNT);
    }

    #[test]
    fn test_later_override_wins() {
        let set = ParameterSet::defaults()
            .with_overrides([(ParamField::Major, "1"), (ParamField::Major, "2")]);
        assert_eq!(set.get(ParamField::Major), "2");
    }

    #[test]
    fn test_with_overrides_leaves_base_untouched() {
        let base = ParameterSet::defaults();
        let _ = base.with_overrides([(ParamField::State, "CA")]);
        assert_eq!(base.get(ParamField::State), "");
    }
}
