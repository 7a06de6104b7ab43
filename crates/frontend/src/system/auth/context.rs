use std::rc::Rc;

use api_client::config::ApiConfig;
use api_client::gateway::{GatewayClient, UnauthorizedHook};
use api_client::session::SessionStore;
use api_client::storage::KeyValueStorage;
use contracts::system::auth::AdminInfo;
use leptos::prelude::*;

use crate::shared::api_utils::api_base;

/// Shared secret for the verification-retry action, baked in at build
/// time. Collaborator credential, not session-derived.
const VERIFY_SECRET: &str = match option_env!("CONSOLE_VERIFY_SECRET") {
    Some(secret) => secret,
    None => "dev-verify-secret",
};

/// Everything the pages need to talk to the backend: the gateway, the
/// session store over the same persisted state, and the reactive
/// identity mirror that gates the login view.
#[derive(Clone)]
pub struct AppApi {
    pub gateway: Rc<GatewayClient>,
    pub session: Rc<SessionStore>,
    pub identity: RwSignal<Option<AdminInfo>>,
}

pub type ApiContext = StoredValue<AppApi, LocalStorage>;

#[cfg(target_arch = "wasm32")]
fn make_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(api_client::storage::BrowserStorage::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn make_storage() -> Rc<dyn KeyValueStorage> {
    Rc::new(api_client::storage::MemoryStorage::new())
}

#[cfg(target_arch = "wasm32")]
fn make_transport() -> Rc<dyn api_client::http::HttpTransport> {
    Rc::new(api_client::fetch::FetchTransport::new())
}

/// Non-browser builds (tests, cargo check) have no fetch API; any
/// accidental call fails fast instead of hanging.
#[cfg(not(target_arch = "wasm32"))]
fn make_transport() -> Rc<dyn api_client::http::HttpTransport> {
    use api_client::http::{ApiRequest, HttpTransport, RawResponse, TransportError};

    struct NoTransport;

    #[async_trait::async_trait(?Send)]
    impl HttpTransport for NoTransport {
        async fn execute(
            &self,
            _url: &str,
            _request: &ApiRequest,
        ) -> Result<RawResponse, TransportError> {
            Err(TransportError("no transport outside the browser".to_string()))
        }
    }

    Rc::new(NoTransport)
}

/// Auth context provider component.
///
/// Builds the storage/gateway/session triple once, restores a persisted
/// session on start (presence only — stale tokens are the server's to
/// reject with 401), and installs the unauthorized hook that flips the
/// app back to the login view.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let storage = make_storage();
    let session = Rc::new(SessionStore::new(Rc::clone(&storage)));
    let identity = RwSignal::new(session.current_identity());

    let on_unauthorized: UnauthorizedHook = Rc::new(move || identity.set(None));
    let gateway = Rc::new(GatewayClient::new(
        ApiConfig::new(api_base(), VERIFY_SECRET),
        make_transport(),
        storage,
        on_unauthorized,
    ));

    let api: ApiContext = StoredValue::new_local(AppApi {
        gateway,
        session,
        identity,
    });
    provide_context(api);

    children()
}

/// Hook to access the API context.
pub fn use_api() -> ApiContext {
    use_context::<ApiContext>().expect("AuthProvider not found in component tree")
}
