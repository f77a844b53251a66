// Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use supercollege::core::Argument;
use supercollege::{Credentials, Operation, RpcTransport, SuperCollege, SuperCollegeSettings, TransportError};

/// Calls seen by a [`RecordingTransport`]
pub type CallLog = Arc<Mutex<Vec<(Operation, Vec<Argument>)>>>;

/// Transport double that records every call and replies with a fixed result
pub struct RecordingTransport {
    calls: CallLog,
    reply: Result<Value, String>,
}

impl RecordingTransport {
    pub fn replying(reply: Value) -> (Self, CallLog) {
        let calls = CallLog::default();
        (Self { calls: calls.clone(), reply: Ok(reply) }, calls)
    }

    pub fn failing(message: &str) -> (Self, CallLog) {
        let calls = CallLog::default();
        (Self { calls: calls.clone(), reply: Err(message.to_string()) }, calls)
    }
}

#[async_trait]
impl RpcTransport for RecordingTransport {
    async fn invoke(&self, operation: Operation, args: &[Argument]) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push((operation, args.to_vec()));
        match &self.reply {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(TransportError::Fault {
                code: "SOAP-ENV:Server".to_string(),
                message: message.clone(),
            }),
        }
    }
}

pub fn test_settings(wsdl: &str) -> SuperCollegeSettings {
    SuperCollegeSettings {
        wsdl: Some(wsdl.to_string()),
        api_key: Some("k".to_string()),
        site_url: Some("https://site".to_string()),
        site_id: Some("42".to_string()),
        api_return_format: Some("json".to_string()),
        ..SuperCollegeSettings::default()
    }
}

pub fn test_credentials() -> Credentials {
    test_settings("https://x/ws?wsdl").validate().unwrap()
}

pub fn client_with(transport: RecordingTransport) -> SuperCollege {
    SuperCollege::with_transport(&test_credentials(), transport)
}

/// Value of a named argument in a recorded call
pub fn arg<'a>(args: &'a [Argument], name: &str) -> Option<&'a str> {
    args.iter().find(|a| a.name == name).map(|a| a.value.as_str())
}

/// A minimal RPC-style WSDL whose endpoint is `{base}/soap`
pub fn wsdl_document(base: &str) -> String {
    let find_parts: String = supercollege::ParamField::ALL
        .iter()
        .map(|f| format!(r#"<part name="{}" type="xsd:string"/>"#, f.name()))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:supercollege"
             targetNamespace="urn:supercollege">
  <message name="findmatchesRequest">{find_parts}</message>
  <message name="getdetailsRequest">
    <part name="returnf" type="xsd:string"/>
    <part name="apikey" type="xsd:string"/>
    <part name="siteurl" type="xsd:string"/>
    <part name="siteid" type="xsd:string"/>
    <part name="userid" type="xsd:string"/>
    <part name="s_uuid" type="xsd:string"/>
  </message>
  <portType name="SuperCollegePort">
    <operation name="findmatches"><input message="tns:findmatchesRequest"/></operation>
    <operation name="getdetails"><input message="tns:getdetailsRequest"/></operation>
  </portType>
  <binding name="SuperCollegeBinding" type="tns:SuperCollegePort">
    <soap:binding style="rpc" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="findmatches">
      <soap:operation soapAction="urn:supercollege#findmatches"/>
      <input><soap:body use="encoded" namespace="urn:supercollege"/></input>
    </operation>
    <operation name="getdetails">
      <soap:operation soapAction="urn:supercollege#getdetails"/>
      <input><soap:body use="encoded" namespace="urn:supercollege"/></input>
    </operation>
  </binding>
  <service name="SuperCollegeService">
    <port name="SuperCollegePort" binding="tns:SuperCollegeBinding">
      <soap:address location="{base}/soap"/>
    </port>
  </service>
</definitions>"#
    )
}

/// Wrap a response element in a SOAP envelope
pub fn soap_envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="urn:supercollege"><SOAP-ENV:Body>{}</SOAP-ENV:Body></SOAP-ENV:Envelope>"#,
        body
    )
}
