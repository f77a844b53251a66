use crate::core::Argument;
use crate::services::transport::{Exchange, Operation, RpcTransport, TransportError};
use crate::services::wsdl::WsdlContract;
use crate::services::xml::XmlNode;
use async_trait::async_trait;
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Fixed options for the SOAP connection
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Keep the last request/response envelopes for inspection
    pub trace: bool,
    pub encoding: &'static str,
    pub timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            trace: true,
            encoding: "UTF-8",
            timeout: Duration::from_secs(30),
        }
    }
}

/// SOAP 1.1 RPC transport driven by a WSDL contract
pub struct SoapTransport {
    client: Client,
    contract: WsdlContract,
    endpoint: String,
    options: ConnectionOptions,
    last_exchange: Mutex<Option<Exchange>>,
}

impl SoapTransport {
    /// Load the WSDL and prepare the HTTP client
    ///
    /// `wsdl` may be an `http(s)://` URL or a local file path.
    pub async fn connect(wsdl: &str, options: ConnectionOptions) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("supercollege/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let document = if wsdl.starts_with("http://") || wsdl.starts_with("https://") {
            tracing::debug!("Fetching WSDL from: {}", wsdl);
            let response = client.get(wsdl).send().await?;
            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(TransportError::Status { status, body });
            }
            response.text().await?
        } else {
            tracing::debug!("Reading WSDL from file: {}", wsdl);
            tokio::fs::read_to_string(wsdl).await?
        };

        let contract = WsdlContract::parse(&document)?;
        let endpoint = contract
            .endpoint
            .clone()
            .unwrap_or_else(|| strip_query(wsdl).to_string());

        tracing::info!(
            "SOAP transport ready: endpoint={}, operations={}",
            endpoint,
            contract.operations.len()
        );

        Ok(Self::from_contract(client, contract, endpoint, options))
    }

    pub fn from_contract(
        client: Client,
        contract: WsdlContract,
        endpoint: String,
        options: ConnectionOptions,
    ) -> Self {
        Self {
            client,
            contract,
            endpoint,
            options,
            last_exchange: Mutex::new(None),
        }
    }

    fn record(&self, request: &str, response: &str) {
        if !self.options.trace {
            return;
        }
        if let Ok(mut slot) = self.last_exchange.lock() {
            *slot = Some(Exchange {
                request: request.to_string(),
                response: response.to_string(),
            });
        }
    }
}

#[async_trait]
impl RpcTransport for SoapTransport {
    async fn invoke(&self, operation: Operation, args: &[Argument]) -> Result<Value, TransportError> {
        let method = operation.method_name();
        let contract = self
            .contract
            .operation(method)
            .ok_or_else(|| TransportError::InvalidWsdl(format!("operation {} not declared", method)))?;
        let part_names = contract.input_parts.as_slice();

        // Positional: the n-th value goes to the n-th declared part
        let named: Vec<(&str, &str)> = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                let name = part_names.get(i).map(String::as_str).unwrap_or(arg.name);
                (name, arg.value.as_str())
            })
            .collect();

        let envelope = build_envelope(
            self.contract.namespace_for(method),
            method,
            &named,
            self.options.encoding,
        );
        let soap_action = contract.soap_action.as_str();

        tracing::debug!(
            "Calling {} on {} with {} arguments",
            method,
            self.endpoint,
            named.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                CONTENT_TYPE,
                format!("text/xml; charset={}", self.options.encoding.to_lowercase()),
            )
            .header("SOAPAction", format!("\"{}\"", soap_action))
            .body(envelope.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        self.record(&envelope, &body);

        // Faults usually arrive with HTTP 500, so look for one before the status
        let document = match XmlNode::parse(&body) {
            Ok(document) => document,
            Err(_) if !status.is_success() => {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(e.into()),
        };

        decode_response(&document, status.as_u16())
    }

    fn last_exchange(&self) -> Option<Exchange> {
        self.last_exchange.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Build a SOAP 1.1 RPC request envelope
pub fn build_envelope(namespace: &str, method: &str, args: &[(&str, &str)], encoding: &str) -> String {
    let mut body = String::with_capacity(256 + args.len() * 32);
    body.push_str(&format!(r#"<?xml version="1.0" encoding="{}"?>"#, encoding));
    body.push_str(&format!(
        r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="{}" xmlns:ns1="{}">"#,
        SOAP_ENV_NS,
        escape(namespace)
    ));
    body.push_str("<SOAP-ENV:Body>");
    body.push_str(&format!("<ns1:{}>", method));
    for (name, value) in args {
        body.push_str(&format!("<{name}>{}</{name}>", escape(*value)));
    }
    body.push_str(&format!("</ns1:{}>", method));
    body.push_str("</SOAP-ENV:Body></SOAP-ENV:Envelope>");
    body
}

/// Extract the operation payload from a response envelope
///
/// A single response part is unwrapped. A string payload holding JSON is decoded.
pub fn decode_response(document: &XmlNode, status: u16) -> Result<Value, TransportError> {
    let body = document
        .child("Body")
        .ok_or_else(|| TransportError::MalformedResponse("missing SOAP Body".into()))?;

    if let Some(fault) = body.child("Fault") {
        let text = |name: &str| fault.child(name).map(|n| n.text.clone()).unwrap_or_default();
        return Err(TransportError::Fault {
            code: text("faultcode"),
            message: text("faultstring"),
        });
    }

    if !(200..300).contains(&status) {
        return Err(TransportError::Status {
            status,
            body: String::new(),
        });
    }

    let response = body
        .children
        .first()
        .ok_or_else(|| TransportError::MalformedResponse("empty SOAP Body".into()))?;

    let payload = match response.children.as_slice() {
        [part] => part.to_value(),
        _ => response.to_value(),
    };

    Ok(match payload {
        Value::String(text) if looks_like_json(&text) => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        other => other,
    })
}

fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[')
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope_with(body: &str) -> XmlNode {
        XmlNode::parse(&format!(
            r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="{}"><SOAP-ENV:Body>{}</SOAP-ENV:Body></SOAP-ENV:Envelope>"#,
            SOAP_ENV_NS, body
        ))
        .unwrap()
    }

    #[test]
    fn test_build_envelope_is_positional_and_escaped() {
        let envelope = build_envelope(
            "urn:sc",
            "findmatches",
            &[("returnf", "xml"), ("major", "11,12"), ("siteurl", "a&b")],
            "UTF-8",
        );
        assert!(envelope.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(envelope.contains(
            "<ns1:findmatches><returnf>xml</returnf><major>11,12</major><siteurl>a&amp;b</siteurl></ns1:findmatches>"
        ));
        assert!(envelope.contains(r#"xmlns:ns1="urn:sc""#));
    }

    #[test]
    fn test_decode_single_part_is_unwrapped() {
        let doc = envelope_with(
            "<ns1:findmatchesResponse><return><scholarships><award><id>1</id></award></scholarships></return></ns1:findmatchesResponse>",
        );
        let value = decode_response(&doc, 200).unwrap();
        assert_eq!(value, json!({"scholarships": {"award": {"id": "1"}}}));
    }

    #[test]
    fn test_decode_json_payload() {
        let doc = envelope_with(
            r#"<ns1:getdetailsResponse><return>{"award":{"details":{"name":"Fund"}}}</return></ns1:getdetailsResponse>"#,
        );
        let value = decode_response(&doc, 200).unwrap();
        assert_eq!(value["award"]["details"]["name"], "Fund");
    }

    #[test]
    fn test_decode_fault() {
        let doc = envelope_with(
            "<SOAP-ENV:Fault><faultcode>SOAP-ENV:Server</faultcode><faultstring>Invalid API key</faultstring></SOAP-ENV:Fault>",
        );
        match decode_response(&doc, 500) {
            Err(TransportError::Fault { code, message }) => {
                assert_eq!(code, "SOAP-ENV:Server");
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_error_status_without_fault() {
        let doc = envelope_with("<ns1:findmatchesResponse/>");
        assert!(matches!(
            decode_response(&doc, 503),
            Err(TransportError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("https://x/ws?wsdl"), "https://x/ws");
        assert_eq!(strip_query("https://x/ws"), "https://x/ws");
    }
}
