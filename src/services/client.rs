use crate::config::{Credentials, SuperCollegeSettings};
use crate::core::{Category, ParamField, ParameterSet};
use crate::error::SuperCollegeError;
use crate::models::{ScholarshipDetail, Scholarships};
use crate::services::soap::SoapTransport;
use crate::services::transport::{Exchange, Operation, RpcTransport, TransportError};
use serde_json::Value;

/// SuperCollege scholarship search client
///
/// A value of this type is always ready to call: construction validates the
/// configuration, opens the connection and builds the baseline request record.
pub struct SuperCollege {
    transport: Box<dyn RpcTransport>,
    baseline: ParameterSet,
}

impl SuperCollege {
    /// Validate `settings` and connect to the WSDL endpoint
    pub async fn connect(settings: &SuperCollegeSettings) -> Result<Self, SuperCollegeError> {
        let credentials = settings.validate()?;

        let transport = SoapTransport::connect(credentials.wsdl(), settings.connection_options())
            .await
            .map_err(SuperCollegeError::Connection)?;

        Ok(Self::with_transport(&credentials, transport))
    }

    /// Build a client over an already opened transport
    pub fn with_transport<T>(credentials: &Credentials, transport: T) -> Self
    where
        T: RpcTransport + 'static,
    {
        Self {
            transport: Box::new(transport),
            baseline: ParameterSet::defaults().inject_authentication(credentials),
        }
    }

    /// The default record with authentication applied
    pub fn baseline(&self) -> &ParameterSet {
        &self.baseline
    }

    /// Request and response envelopes of the last call, when tracing is on
    pub fn last_exchange(&self) -> Option<Exchange> {
        self.transport.last_exchange()
    }

    /// Merge overrides onto the baseline; authentication fields always keep
    /// their configured values
    pub fn params_with<I, V>(&self, overrides: I) -> ParameterSet
    where
        I: IntoIterator<Item = (ParamField, V)>,
        V: Into<String>,
    {
        let merged = self.baseline.with_overrides(overrides);
        ParamField::AUTHENTICATION
            .iter()
            .fold(merged, |set, field| set.with(*field, self.baseline.get(*field)))
    }

    /// Run `findmatches` with a complete record
    pub async fn fetch_matches(&self, params: &ParameterSet) -> Result<Scholarships, SuperCollegeError> {
        let operation = Operation::FindMatches;
        let response = self
            .transport
            .invoke(operation, &params.arguments())
            .await
            .map_err(|e| remote_failure(operation, e))?;

        let scholarships = match response.get("scholarships") {
            Some(Value::Object(scholarships)) => Scholarships::from_award_value(scholarships.get("award")),
            Some(_) => Scholarships::default(),
            None => {
                return Err(remote_failure(
                    operation,
                    TransportError::MalformedResponse("missing scholarships".into()),
                ))
            }
        };

        tracing::debug!("findmatches returned {} awards", scholarships.len());
        Ok(scholarships)
    }

    /// Run `getdetails` for one award
    pub async fn fetch_details(&self, uuid: &str) -> Result<ScholarshipDetail, SuperCollegeError> {
        let operation = Operation::GetDetails;
        let mut response = self
            .transport
            .invoke(operation, &self.baseline.details_arguments(uuid))
            .await
            .map_err(|e| remote_failure(operation, e))?;

        match response.pointer_mut("/award/details") {
            Some(details) => Ok(details.take()),
            None => Err(remote_failure(
                operation,
                TransportError::MalformedResponse("missing award.details".into()),
            )),
        }
    }

    pub async fn fetch_by_params<I, V>(&self, overrides: I) -> Result<Scholarships, SuperCollegeError>
    where
        I: IntoIterator<Item = (ParamField, V)>,
        V: Into<String>,
    {
        self.fetch_matches(&self.params_with(overrides)).await
    }

    /// Search on a single category with a comma-joined identifier list
    pub async fn fetch_by_category<S: AsRef<str>>(
        &self,
        category: Category,
        ids: &[S],
    ) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_matches(&category.apply(&self.baseline, ids)).await
    }

    pub async fn by_major<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Major, ids).await
    }

    pub async fn by_career<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Career, ids).await
    }

    pub async fn by_interest<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Interest, ids).await
    }

    pub async fn by_ethnicity<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Ethnicity, ids).await
    }

    pub async fn by_religion<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Religion, ids).await
    }

    pub async fn by_disability<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Disability, ids).await
    }

    pub async fn by_state<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::State, ids).await
    }

    pub async fn by_membership<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Membership, ids).await
    }

    /// Military affiliation
    pub async fn by_military<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Military, ids).await
    }

    pub async fn by_sport<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Sport, ids).await
    }

    /// Special circumstance; the service accepts one at a time
    pub async fn by_circumstance(&self, id: &str) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::Circumstance, &[id]).await
    }

    /// College choice, by OPE identifier
    pub async fn by_college_choice<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::CollegeChoice, ids).await
    }

    pub async fn by_zipcode<S: AsRef<str>>(&self, ids: &[S]) -> Result<Scholarships, SuperCollegeError> {
        self.fetch_by_category(Category::ZipCode, ids).await
    }
}

fn remote_failure(operation: Operation, cause: TransportError) -> SuperCollegeError {
    tracing::warn!("{} failed: {}", operation, cause);
    SuperCollegeError::remote(operation, cause)
}
