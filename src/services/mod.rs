// Service exports
pub mod client;
pub mod soap;
pub mod transport;
pub mod wsdl;
pub mod xml;

pub use client::SuperCollege;
pub use soap::{ConnectionOptions, SoapTransport};
pub use transport::{Exchange, Operation, RpcTransport, TransportError};
pub use wsdl::{OperationContract, WsdlContract};
pub use xml::{XmlError, XmlNode};
