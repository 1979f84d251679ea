use crate::api::ApiClient;
use crate::models::StartupEntry;
use crate::session::Session;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Long-lived connection to the server process.
    pub session: Session,

    /// Reorderable startup entries, seeded from the bootstrap payload.
    pub startup_items: RwSignal<Vec<StartupEntry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            session: Session::new(),
            startup_items: RwSignal::new(vec![]),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
