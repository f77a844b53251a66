use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An award record from `findmatches`, passed through as the service returned it
pub type Award = Value;

/// `award.details` of a `getdetails` response
pub type ScholarshipDetail = Value;

/// Ordered awards returned by a match query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scholarships {
    awards: Vec<Award>,
}

impl Scholarships {
    pub fn new(awards: Vec<Award>) -> Self {
        Self { awards }
    }

    /// Reshape the `award` member of a `scholarships` element
    ///
    /// The service sends a single object when there is one award and omits the
    /// member (or sends an empty element) when there are none.
    pub fn from_award_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Array(items)) => Self::new(items.clone()),
            Some(award @ Value::Object(_)) => Self::new(vec![award.clone()]),
            _ => Self::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Award> {
        self.awards.iter()
    }

    pub fn first(&self) -> Option<&Award> {
        self.awards.first()
    }

    pub fn into_vec(self) -> Vec<Award> {
        self.awards
    }
}

impl IntoIterator for Scholarships {
    type Item = Award;
    type IntoIter = std::vec::IntoIter<Award>;

    fn into_iter(self) -> Self::IntoIter {
        self.awards.into_iter()
    }
}

impl<'a> IntoIterator for &'a Scholarships {
    type Item = &'a Award;
    type IntoIter = std::slice::Iter<'a, Award>;

    fn into_iter(self) -> Self::IntoIter {
        self.awards.iter()
    }
}

impl FromIterator<Award> for Scholarships {
    fn from_iter<I: IntoIterator<Item = Award>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
