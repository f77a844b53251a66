use crate::core::Argument;
use crate::services::xml::XmlError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Remote operations exposed by the SuperCollege service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindMatches,
    GetDetails,
}

impl Operation {
    /// Operation name as declared in the WSDL
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::FindMatches => "findmatches",
            Operation::GetDetails => "getdetails",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Errors that can occur while talking to the remote endpoint
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read WSDL: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("invalid WSDL: {0}")]
    InvalidWsdl(String),

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("remote service returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Raw request and response envelopes of the most recent call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    pub request: String,
    pub response: String,
}

/// A positional RPC channel to the remote service
///
/// Implementations return the decoded payload of the operation's response.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn invoke(&self, operation: Operation, args: &[Argument]) -> Result<Value, TransportError>;

    /// Last exchange, when tracing is enabled
    fn last_exchange(&self) -> Option<Exchange> {
        None
    }
}
