// Common test utilities for integration tests

use pdns_webhook::credentials::StaticCredentialStore;
use pdns_webhook::solver::{ChallengeRequest, PowerDnsSolver};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ZONE: &str = "example.com.";
pub const FQDN: &str = "_acme-challenge.example.com.";
pub const ZONE_PATH: &str = "/api/v1/servers/localhost/zones/example.com.";
pub const NAMESPACE: &str = "cert-manager";

/// RRSets held by the fake server, in PowerDNS JSON form
#[derive(Clone, Default)]
pub struct ZoneState(pub Arc<Mutex<Vec<Value>>>);

impl ZoneState {
    pub fn with_txt(contents: &[&str]) -> Self {
        let state = Self::default();
        state.0.lock().unwrap().push(txt_rrset(FQDN, contents));
        state
    }

    /// Contents of the TXT set at `name`, or `None` if it does not exist
    pub fn txt_contents(&self, name: &str) -> Option<Vec<String>> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|set| set["name"] == name && set["type"] == "TXT")
            .map(|set| {
                set["records"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r["content"].as_str().unwrap().to_string())
                    .collect()
            })
    }
}

pub fn txt_rrset(name: &str, contents: &[&str]) -> Value {
    let records: Vec<Value> = contents
        .iter()
        .map(|c| json!({"content": c, "disabled": false}))
        .collect();
    json!({"name": name, "type": "TXT", "ttl": 300, "records": records})
}

struct GetZone(ZoneState);

impl Respond for GetZone {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let rrsets = self.0 .0.lock().unwrap().clone();
        ResponseTemplate::new(200).set_body_json(json!({
            "id": ZONE,
            "name": ZONE,
            "rrsets": rrsets
        }))
    }
}

/// Applies REPLACE changes: the set is substituted whole, empty deletes it
struct PatchZone(ZoneState);

impl Respond for PatchZone {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400);
        };
        let mut rrsets = self.0 .0.lock().unwrap();
        for change in body["rrsets"].as_array().cloned().unwrap_or_default() {
            if change["changetype"] != "REPLACE" {
                return ResponseTemplate::new(422);
            }
            rrsets.retain(|set| !(set["name"] == change["name"] && set["type"] == change["type"]));
            if !change["records"].as_array().is_none_or(Vec::is_empty) {
                let mut stored = change.clone();
                stored.as_object_mut().unwrap().remove("changetype");
                rrsets.push(stored);
            }
        }
        ResponseTemplate::new(204)
    }
}

/// Start a fake PowerDNS server backed by `state`
pub async fn start_pdns(state: &ZoneState) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ZONE_PATH))
        .respond_with(GetZone(state.clone()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(ZONE_PATH))
        .respond_with(PatchZone(state.clone()))
        .mount(&server)
        .await;
    server
}

pub fn solver() -> PowerDnsSolver {
    PowerDnsSolver::new("acme.example.com").with_credentials(Arc::new(
        StaticCredentialStore::default().with_secret(NAMESPACE, "pdns", "api-key", "secret"),
    ))
}

pub fn challenge(server: &MockServer, key: &str, extra: Value) -> ChallengeRequest {
    let mut config = json!({
        "host": server.uri(),
        "apiKeySecretRef": {"name": "pdns", "key": "api-key"}
    });
    if let (Some(base), Some(overrides)) = (config.as_object_mut(), extra.as_object()) {
        for (k, v) in overrides {
            base.insert(k.clone(), v.clone());
        }
    }

    ChallengeRequest {
        uid: format!("uid-{key}"),
        dns_name: "example.com".to_string(),
        resolved_fqdn: FQDN.to_string(),
        resolved_zone: ZONE.to_string(),
        key: key.to_string(),
        resource_namespace: NAMESPACE.to_string(),
        config: Some(config),
    }
}
