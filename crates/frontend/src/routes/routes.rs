use leptos::prelude::*;

use crate::layout::Shell;
use crate::system::auth::context::use_api;
use crate::system::pages::login::LoginPage;

#[component]
pub fn AppRoutes() -> impl IntoView {
    let api = use_api();
    let identity = api.with_value(|a| a.identity);

    view! {
        <Show
            when=move || identity.get().is_some()
            fallback=|| view! { <LoginPage /> }
        >
            <Shell />
        </Show>
    }
}
