// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Award, ScholarshipDetail, Scholarships};
pub use requests::{CategorySearchRequest, ParamsSearchRequest};
pub use responses::{DetailResponse, ErrorResponse, HealthResponse, ScholarshipsResponse};
