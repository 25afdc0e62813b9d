/*!
In-memory Hermes store for developing without a server

Implements `Transport`, so `StoreClient<MockStore>` exercises the real request
mapping. Every request is recorded together with the status it got.
*/

use hermes_client::{ClientError, Endpoint, Method, StoreClient, StoreRequest, StoreResponse, Transport};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: StoreRequest,
    /// `None` when the request was refused at transport level
    pub status: Option<u16>,
}

impl RecordedRequest {
    pub fn is(&self, method: Method, endpoint: Endpoint) -> bool {
        self.request.method == method && self.request.endpoint == endpoint
    }
}

#[derive(Debug, Clone, Copy)]
enum Injected {
    Refuse,
    Status(u16),
}

#[derive(Debug, Default)]
struct State {
    groups: BTreeMap<String, BTreeMap<String, String>>,
    requests: Vec<RecordedRequest>,
    injected: HashMap<(Method, Endpoint), Injected>,
    conflict_on_duplicate: bool,
}

/// Mock store shared between clones
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<State>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store client writing into this mock
    pub fn client(&self) -> StoreClient<MockStore> {
        StoreClient::with_transport(self.clone())
    }

    /// Pre-create a group
    pub fn with_group(self, group: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .groups
            .entry(group.to_string())
            .or_default();
        self
    }

    /// Answer 409 when creating a group that already exists
    pub fn with_conflict_on_duplicate(self) -> Self {
        self.state.lock().unwrap().conflict_on_duplicate = true;
        self
    }

    /// Fail every `method` on `endpoint` with a connection error
    pub fn refuse(&self, method: Method, endpoint: Endpoint) {
        self.state
            .lock()
            .unwrap()
            .injected
            .insert((method, endpoint), Injected::Refuse);
    }

    /// Answer every `method` on `endpoint` with `status`, without side effects
    pub fn reject(&self, method: Method, endpoint: Endpoint, status: u16) {
        self.state
            .lock()
            .unwrap()
            .injected
            .insert((method, endpoint), Injected::Status(status));
    }

    pub fn groups(&self) -> Vec<String> {
        self.state.lock().unwrap().groups.keys().cloned().collect()
    }

    pub fn item(&self, group: &str, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .groups
            .get(group)
            .and_then(|items| items.get(key).cloned())
    }

    /// All items of a group, sorted by key
    pub fn items(&self, group: &str) -> Vec<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .groups
            .get(group)
            .map(|items| items.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method, endpoint: Endpoint) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.is(method, endpoint))
            .count()
    }

    /// Forget recorded requests and injected failures; data stays
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.requests.clear();
        state.injected.clear();
    }
}

impl State {
    fn handle(&mut self, request: &StoreRequest) -> StoreResponse {
        let name = request.query_value("name").unwrap_or_default().to_string();
        let group = request.query_value("group").unwrap_or_default().to_string();

        match (request.method, request.endpoint) {
            (Method::Get, Endpoint::Group) => {
                let names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
                StoreResponse::new(200, names.join("\n"))
            }
            (Method::Post, Endpoint::Group) => {
                if self.groups.contains_key(&name) {
                    if self.conflict_on_duplicate {
                        StoreResponse::new(409, format!("group {name} already exists"))
                    } else {
                        StoreResponse::new(200, "")
                    }
                } else {
                    self.groups.insert(name, BTreeMap::new());
                    StoreResponse::new(201, "")
                }
            }
            (Method::Delete, Endpoint::Group) => match self.groups.remove(&name) {
                Some(_) => StoreResponse::new(200, ""),
                None => not_found("group", &name),
            },
            (method, endpoint) => {
                let Some(items) = self.groups.get_mut(&group) else {
                    return not_found("group", &group);
                };
                match (method, endpoint) {
                    (Method::Post, Endpoint::Item) => {
                        items.insert(name, request.body.clone().unwrap_or_default());
                        StoreResponse::new(200, "")
                    }
                    (Method::Get, Endpoint::Item) => match items.get(&name) {
                        Some(value) => StoreResponse::new(200, value.clone()),
                        None => not_found("item", &name),
                    },
                    (Method::Delete, Endpoint::Item) => match items.remove(&name) {
                        Some(_) => StoreResponse::new(200, ""),
                        None => not_found("item", &name),
                    },
                    (Method::Get, Endpoint::Filter) => {
                        let matches: Vec<String> = items
                            .iter()
                            .filter(|(key, _)| key.contains(&name))
                            .map(|(key, value)| format!("{key}={value}"))
                            .collect();
                        StoreResponse::new(200, matches.join("\n"))
                    }
                    _ => StoreResponse::new(405, "method not allowed"),
                }
            }
        }
    }
}

fn not_found(kind: &str, name: &str) -> StoreResponse {
    StoreResponse::new(404, format!("no such {kind}: {name}"))
}

impl Transport for MockStore {
    async fn send(&self, request: &StoreRequest) -> Result<StoreResponse, ClientError> {
        let mut state = self.state.lock().unwrap();
        let injected = state.injected.get(&(request.method, request.endpoint)).copied();

        let response = match injected {
            Some(Injected::Refuse) => None,
            Some(Injected::Status(status)) => Some(StoreResponse::new(status, "injected failure")),
            None => Some(state.handle(request)),
        };

        state.requests.push(RecordedRequest {
            request: request.clone(),
            status: response.as_ref().map(|r| r.status),
        });
        log::debug!(
            "[MOCK] {} -> {:?}",
            request,
            response.as_ref().map(|r| r.status)
        );

        response.ok_or_else(|| std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_client::{Command, Store};

    fn command(args: &[&str]) -> Command {
        Command::parse(args).unwrap()
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let store = MockStore::new();
        let client = store.client();

        assert_eq!(client.create_group("memory").await.unwrap().status, 201);
        client.set_item("memory", "atihome.total", "1000").await.unwrap();

        let got = client.execute(&command(&["get-item", "memory/atihome.total"])).await.unwrap();
        assert_eq!(got.status, 200);
        assert_eq!(got.body, "1000");

        let filtered = client.execute(&command(&["filter-item", "memory/atihome"])).await.unwrap();
        assert_eq!(filtered.body, "atihome.total=1000");

        client.execute(&command(&["rem-item", "memory/atihome.total"])).await.unwrap();
        assert_eq!(store.item("memory", "atihome.total"), None);

        client.execute(&command(&["rem-group", "memory"])).await.unwrap();
        assert!(store.groups().is_empty());
        assert_eq!(store.requests().len(), 6);
    }

    #[tokio::test]
    async fn test_missing_group_and_item() {
        let client = MockStore::new().with_group("system").client();

        let response = client.set_item("storage", "x", "1").await.unwrap();
        assert_eq!(response.status, 404);

        let response = client.execute(&command(&["get-item", "system/x"])).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_duplicate_group_creation() {
        let store = MockStore::new().with_group("memory");
        assert_eq!(store.client().create_group("memory").await.unwrap().status, 200);
        assert_eq!(store.groups(), ["memory"]);

        let strict = MockStore::new().with_group("memory").with_conflict_on_duplicate();
        assert_eq!(strict.client().create_group("memory").await.unwrap().status, 409);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MockStore::new().with_group("memory");
        store.refuse(Method::Get, Endpoint::Group);
        store.reject(Method::Post, Endpoint::Item, 503);
        let client = store.client();

        assert!(client.list_groups().await.is_err());
        assert_eq!(client.set_item("memory", "k", "v").await.unwrap().status, 503);
        assert_eq!(store.item("memory", "k"), None);

        let requests = store.requests();
        assert_eq!(requests[0].status, None);
        assert_eq!(requests[1].status, Some(503));

        store.clear();
        assert!(store.requests().is_empty());
        assert_eq!(client.list_groups().await.unwrap().group_names(), ["memory"]);
    }
}
