use leptos::prelude::*;

use crate::system::auth::context::use_api;

#[component]
pub fn Header() -> impl IntoView {
    let api = use_api();
    let identity = api.with_value(|a| a.identity);

    let on_logout = move |_| {
        // Local clear plus navigation back to the login view. Requests
        // already in flight are not cancelled.
        api.with_value(|a| a.session.logout());
        identity.set(None);
    };

    view! {
        <header class="app-header">
            <div class="app-header__title">"Payment Admin Console"</div>
            <div class="app-header__user">
                {move || {
                    identity
                        .get()
                        .map(|admin| {
                            view! {
                                <span class="app-header__name">{admin.username.clone()}</span>
                                <span class="app-header__role">{admin.role.clone()}</span>
                            }
                        })
                }}
                <button class="btn btn-secondary" on:click=on_logout>
                    "Sign out"
                </button>
            </div>
        </header>
    }
}
