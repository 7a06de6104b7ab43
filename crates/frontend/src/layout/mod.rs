pub mod header;
pub mod sidebar;

use leptos::prelude::*;

use crate::domain::disbursements::ui::list::DisbursementsList;
use crate::domain::payments::ui::list::PaymentsList;
use crate::domain::provider_settlements::ui::list::ProviderSettlementsList;
use crate::domain::settlements::ui::list::SettlementsList;

/// Top-level console sections, one per resource listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Payments,
    Disbursements,
    Settlements,
    ProviderSettlements,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Payments => "Payments",
            Section::Disbursements => "Disbursements",
            Section::Settlements => "Settlements",
            Section::ProviderSettlements => "Provider Settlements",
        }
    }

    pub fn all() -> [Section; 4] {
        [
            Section::Payments,
            Section::Disbursements,
            Section::Settlements,
            Section::ProviderSettlements,
        ]
    }
}

/// Authenticated shell: sidebar navigation, header, active section.
///
/// Switching sections drops the previous page together with its query
/// controller; each mount starts from the default filter state.
#[component]
pub fn Shell() -> impl IntoView {
    let active = RwSignal::new(Section::Payments);

    view! {
        <div class="app-shell">
            <sidebar::Sidebar active=active />
            <div class="app-main">
                <header::Header />
                <main class="app-content">
                    {move || match active.get() {
                        Section::Payments => view! { <PaymentsList /> }.into_any(),
                        Section::Disbursements => view! { <DisbursementsList /> }.into_any(),
                        Section::Settlements => view! { <SettlementsList /> }.into_any(),
                        Section::ProviderSettlements => {
                            view! { <ProviderSettlementsList /> }.into_any()
                        }
                    }}
                </main>
            </div>
        </div>
    }
}
