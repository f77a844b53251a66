use crate::services::transport::TransportError;
use crate::services::xml::XmlNode;
use std::collections::HashMap;

/// What the client needs to know about one WSDL operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationContract {
    pub soap_action: String,
    pub namespace: Option<String>,
    /// Input message part names, in positional order
    pub input_parts: Vec<String>,
}

/// The subset of a WSDL 1.1 document used to build RPC calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WsdlContract {
    pub target_namespace: String,
    pub endpoint: Option<String>,
    pub operations: HashMap<String, OperationContract>,
}

impl WsdlContract {
    pub fn parse(document: &str) -> Result<Self, TransportError> {
        let root = XmlNode::parse(document)?;
        if root.name != "definitions" {
            return Err(TransportError::InvalidWsdl(format!(
                "expected <definitions> root, found <{}>",
                root.name
            )));
        }

        let target_namespace = root.attribute("targetNamespace").unwrap_or_default().to_string();

        let messages: HashMap<&str, Vec<String>> = root
            .children_named("message")
            .filter_map(|message| {
                let name = message.attribute("name")?;
                let parts = message
                    .children_named("part")
                    .filter_map(|part| part.attribute("name").map(str::to_string))
                    .collect();
                Some((name, parts))
            })
            .collect();

        let mut operations: HashMap<String, OperationContract> = HashMap::new();

        for operation in root
            .children_named("portType")
            .flat_map(|port_type| port_type.children_named("operation"))
        {
            let Some(name) = operation.attribute("name") else {
                continue;
            };
            let input_parts = operation
                .child("input")
                .and_then(|input| input.attribute("message"))
                .and_then(|message| messages.get(strip_prefix(message)))
                .cloned()
                .unwrap_or_default();
            operations.entry(name.to_string()).or_default().input_parts = input_parts;
        }

        for operation in root
            .children_named("binding")
            .flat_map(|binding| binding.children_named("operation"))
        {
            let Some(name) = operation.attribute("name") else {
                continue;
            };
            let contract = operations.entry(name.to_string()).or_default();
            if let Some(action) = operation
                .child("operation")
                .and_then(|soap_op| soap_op.attribute("soapAction"))
            {
                contract.soap_action = action.to_string();
            }
            contract.namespace = operation
                .child("input")
                .and_then(|input| input.child("body"))
                .and_then(|body| body.attribute("namespace"))
                .map(str::to_string);
        }

        let endpoint = root
            .children_named("service")
            .flat_map(|service| service.children_named("port"))
            .find_map(|port| port.child("address"))
            .and_then(|address| address.attribute("location"))
            .map(str::to_string);

        Ok(Self {
            target_namespace,
            endpoint,
            operations,
        })
    }

    pub fn operation(&self, name: &str) -> Option<&OperationContract> {
        self.operations.get(name)
    }

    /// Body namespace for an operation, falling back to the target namespace
    pub fn namespace_for(&self, name: &str) -> &str {
        self.operation(name)
            .and_then(|op| op.namespace.as_deref())
            .unwrap_or(&self.target_namespace)
    }
}

fn strip_prefix(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
             xmlns:tns="urn:scholarships"
             targetNamespace="urn:scholarships">
  <message name="getdetailsRequest">
    <part name="returnf" type="xsd:string"/>
    <part name="apikey" type="xsd:string"/>
    <part name="s_uuid" type="xsd:string"/>
  </message>
  <portType name="ScholarshipPort">
    <operation name="getdetails">
      <input message="tns:getdetailsRequest"/>
    </operation>
  </portType>
  <binding name="ScholarshipBinding" type="tns:ScholarshipPort">
    <soap:binding style="rpc" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="getdetails">
      <soap:operation soapAction="urn:scholarships#getdetails"/>
      <input><soap:body use="encoded" namespace="urn:scholarships:rpc"/></input>
    </operation>
  </binding>
  <service name="ScholarshipService">
    <port name="ScholarshipPort" binding="tns:ScholarshipBinding">
      <soap:address location="https://api.example.test/soap/server.php"/>
    </port>
  </service>
</definitions>"#;

    #[test]
    fn test_parse_contract() {
        let contract = WsdlContract::parse(WSDL).unwrap();
        assert_eq!(contract.target_namespace, "urn:scholarships");
        assert_eq!(
            contract.endpoint.as_deref(),
            Some("https://api.example.test/soap/server.php")
        );

        let details = contract.operation("getdetails").unwrap();
        assert_eq!(details.soap_action, "urn:scholarships#getdetails");
        assert_eq!(details.input_parts, vec!["returnf", "apikey", "s_uuid"]);
        assert_eq!(contract.namespace_for("getdetails"), "urn:scholarships:rpc");
        assert_eq!(contract.namespace_for("findmatches"), "urn:scholarships");
    }

    #[test]
    fn test_rejects_non_wsdl() {
        let err = WsdlContract::parse("<html><body>nope</body></html>").unwrap_err();
        assert!(err.to_string().contains("<html>"));
    }
}
