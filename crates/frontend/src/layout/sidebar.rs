use leptos::prelude::*;

use super::Section;

#[component]
pub fn Sidebar(active: RwSignal<Section>) -> impl IntoView {
    view! {
        <aside class="sidebar">
            <div class="sidebar__brand">"Payment Console"</div>
            <nav class="sidebar__nav">
                {Section::all()
                    .into_iter()
                    .map(|section| {
                        view! {
                            <button
                                class=move || {
                                    if active.get() == section {
                                        "nav-item nav-item--active"
                                    } else {
                                        "nav-item"
                                    }
                                }
                                on:click=move |_| active.set(section)
                            >
                                {section.title()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
        </aside>
    }
}
