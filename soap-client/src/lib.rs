//! Private SOAP client for VAPIX web-service communication
//!
//! This crate provides a minimal SOAP 1.2 client specifically designed for
//! talking to the fixed `/vapix/services` endpoint on Axis network cameras.
//! It builds the request envelope, posts it, and unwraps the response down
//! to the `{Action}Response` element.

mod error;

pub use error::SoapError;

use std::time::Duration;
use xmltree::Element;

/// A minimal SOAP client for VAPIX web-service communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
        }
    }

    /// Send a VAPIX SOAP request and return the parsed response element
    ///
    /// # Arguments
    /// * `host` - Device address, `ip` or `ip:port`
    /// * `action` - VAPIX event-service action name (e.g. "GetEventInstances")
    /// * `payload` - Inner XML placed inside the action element, often empty
    ///
    /// # Returns
    /// The `{action}Response` element from the SOAP body
    pub fn call(&self, host: &str, action: &str, payload: &str) -> Result<Element, SoapError> {
        // Inline SOAP envelope construction - no separate module needed
        let body = format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#,
                r#" xmlns:xsd="http://www.w3.org/2001/XMLSchema""#,
                r#" xmlns:aev="http://www.axis.com/vapix/ws/event1""#,
                r#" xmlns:tns1="http://www.onvif.org/ver10/topics""#,
                r#" xmlns:tnsaxis="http://www.axis.com/2009/event/topics""#,
                r#" xmlns:wsnt="http://docs.oasis-open.org/wsn/b-2""#,
                r#" xmlns:soap="http://www.w3.org/2003/05/soap-envelope">"#,
                r#"<soap:Body>"#,
                r#"<aev:{action} xmlns="http://www.axis.com/vapix/ws/event1">{payload}</aev:{action}>"#,
                r#"</soap:Body>"#,
                r#"</soap:Envelope>"#
            ),
            action = action,
            payload = payload
        );

        let url = format!("http://{}/vapix/services", host);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/soap+xml; charset=utf-8")
            .send_string(&body)
            .map_err(|e| SoapError::Network(e.to_string()))?;

        let xml_text = response
            .into_string()
            .map_err(|e| SoapError::Network(e.to_string()))?;

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        // Extract response or handle SOAP fault
        extract_response(&xml, action)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap a SOAP envelope down to the `{action}Response` element
pub fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    // Check for SOAP fault first
    if let Some(fault) = body.get_child("Fault") {
        return Err(SoapError::Fault(fault_reason(fault)));
    }

    // Extract the action response
    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}

/// Pull a readable reason out of a SOAP 1.2 fault, with a SOAP 1.1 fallback
fn fault_reason(fault: &Element) -> String {
    let soap12 = fault
        .get_child("Reason")
        .and_then(|r| r.get_child("Text"))
        .and_then(|t| t.get_text())
        .map(|t| t.trim().to_string());
    let soap11 = || {
        fault
            .get_child("faultstring")
            .and_then(|t| t.get_text())
            .map(|t| t.trim().to_string())
    };
    soap12
        .or_else(soap11)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown fault".to_string())
}
