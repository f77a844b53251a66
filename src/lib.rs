//! SuperCollege - client for the SuperCollege scholarship matching service
//!
//! This library wraps the service's SOAP API: it validates the account
//! configuration, builds the positional request record for `findmatches` and
//! `getdetails`, and reshapes the responses into plain values.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod provider;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::config::{Credentials, Settings, SuperCollegeSettings};
pub use crate::core::{Category, ParamField, ParameterSet};
pub use crate::error::{ConfigField, SuperCollegeError};
pub use crate::models::{Award, ScholarshipDetail, Scholarships};
pub use crate::provider::SuperCollegeProvider;
pub use crate::services::{Operation, RpcTransport, SuperCollege, TransportError};
