use std::rc::Rc;

use api_client::query::{Filter, QueryController};
use api_client::resources::provider_settlements::ProviderSettlementsQuery;
use api_client::resources::refdata;
use contracts::domain::provider_settlements::{ProviderSettlement, ProviderSettlementStatus};
use contracts::domain::refdata::{Currency, Provider};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::StatCard;
use crate::shared::export::{export_to_csv, CsvExportable};
use crate::shared::format::{
    format_amount, format_date, parse_date_input, parse_id_filter, status_badge_class,
};
use crate::system::auth::context::use_api;

impl CsvExportable for ProviderSettlement {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Provider ID",
            "Currency ID",
            "Period Start",
            "Period End",
            "Expected",
            "Reported",
            "Delta",
            "Status",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.provider_id.to_string(),
            self.currency_id.to_string(),
            format_date(self.period_start),
            format_date(self.period_end),
            format_amount(&self.expected_amount),
            format_amount(&self.reported_amount),
            format_amount(&self.delta),
            self.status.code().to_string(),
        ]
    }
}

#[component]
pub fn ProviderSettlementsList() -> impl IntoView {
    let api = use_api();
    let ctrl = StoredValue::new_local(QueryController::<ProviderSettlementsQuery>::new(
        api.with_value(|a| Rc::clone(&a.gateway)),
    ));
    let version = RwSignal::new(0u32);
    ctrl.with_value(|c| c.set_on_change(move || version.update(|v| *v += 1)));

    let snapshot = move || {
        version.get();
        ctrl.with_value(|c| c.snapshot())
    };

    let run_fetch = move || {
        spawn_local(async move {
            let Some(c) = ctrl.try_get_value() else { return };
            c.fetch().await;
        });
    };

    let set_filter = move |filter: Filter| {
        ctrl.with_value(|c| c.set_filter(filter));
        run_fetch();
    };

    let (providers, set_providers) = signal(Vec::<Provider>::new());
    let (currencies, set_currencies) = signal(Vec::<Currency>::new());
    spawn_local(async move {
        let gateway = api.with_value(|a| Rc::clone(&a.gateway));
        match refdata::fetch_providers(&gateway).await {
            Ok(list) => set_providers.set(list),
            Err(e) => log::error!("failed to load providers: {}", e),
        }
        match refdata::fetch_currencies(&gateway).await {
            Ok(list) => set_currencies.set(list),
            Err(e) => log::error!("failed to load currencies: {}", e),
        }
    });

    let (action_message, set_action_message) = signal(Option::<String>::None);

    let provider_name = move |id: i64| {
        providers
            .get()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    let currency_code = move |id: i64| {
        currencies
            .get()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.code.clone())
            .unwrap_or_else(|| id.to_string())
    };

    run_fetch();

    view! {
        <div class="content">
            <div class="page-header">
                <h2>"Provider Settlements"</h2>
                <div class="page-header__actions">
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| run_fetch()
                        disabled=move || snapshot().loading
                    >
                        {move || if snapshot().loading { "Loading..." } else { "Refresh" }}
                    </button>
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| {
                            ctrl.with_value(|c| c.clear_filters());
                            run_fetch();
                        }
                    >
                        "Clear filters"
                    </button>
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| {
                            let snap = ctrl.with_value(|c| c.snapshot());
                            if let Err(e) = export_to_csv(&snap.items, "provider-settlements.csv") {
                                set_action_message.set(Some(e));
                            }
                        }
                    >
                        "Export CSV"
                    </button>
                </div>
            </div>

            <div class="filter-panel">
                <select
                    class="filter-select"
                    prop:value=move || snapshot().filters.status.clone().unwrap_or_default()
                    on:change=move |ev| set_filter(Filter::Status(Some(event_target_value(&ev))))
                >
                    <option value="">"All statuses"</option>
                    {ProviderSettlementStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </select>
                <select
                    class="filter-select"
                    prop:value=move || {
                        snapshot().filters.provider_id.map(|v| v.to_string()).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        set_filter(Filter::Provider(parse_id_filter(&event_target_value(&ev))))
                    }
                >
                    <option value="">"All providers"</option>
                    {move || {
                        providers
                            .get()
                            .into_iter()
                            .map(|p| view! { <option value=p.id.to_string()>{p.name.clone()}</option> })
                            .collect_view()
                    }}
                </select>
                <select
                    class="filter-select"
                    prop:value=move || {
                        snapshot().filters.currency_id.map(|v| v.to_string()).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        set_filter(Filter::Currency(parse_id_filter(&event_target_value(&ev))))
                    }
                >
                    <option value="">"All currencies"</option>
                    {move || {
                        currencies
                            .get()
                            .into_iter()
                            .map(|c| view! { <option value=c.id.to_string()>{c.code.clone()}</option> })
                            .collect_view()
                    }}
                </select>
                <input
                    class="filter-input"
                    type="date"
                    prop:value=move || {
                        snapshot().filters.start_date.map(format_date).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        set_filter(Filter::StartDate(parse_date_input(&event_target_value(&ev))))
                    }
                />
                <input
                    class="filter-input"
                    type="date"
                    prop:value=move || {
                        snapshot().filters.end_date.map(format_date).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        set_filter(Filter::EndDate(parse_date_input(&event_target_value(&ev))))
                    }
                />
            </div>

            {move || action_message.get().map(|m| view! { <div class="notice">{m}</div> })}
            {move || snapshot().error.map(|e| view! { <div class="error">{e}</div> })}

            <div class="stat-row">
                <StatCard
                    label="Total delta"
                    value=Signal::derive(move || format_amount(&snapshot().stats.total_delta))
                />
            </div>

            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Provider"</th>
                            <th>"Currency"</th>
                            <th>"Period"</th>
                            <th class="num">"Expected"</th>
                            <th class="num">"Reported"</th>
                            <th class="num">"Delta"</th>
                            <th>"Status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let snap = snapshot();
                            snap.items
                                .into_iter()
                                .map(|s| {
                                    view! {
                                        <tr>
                                            <td>{s.id}</td>
                                            <td>{provider_name(s.provider_id)}</td>
                                            <td>{currency_code(s.currency_id)}</td>
                                            <td>
                                                {format!(
                                                    "{} - {}",
                                                    format_date(s.period_start),
                                                    format_date(s.period_end),
                                                )}
                                            </td>
                                            <td class="num">{format_amount(&s.expected_amount)}</td>
                                            <td class="num">{format_amount(&s.reported_amount)}</td>
                                            <td class="num">{format_amount(&s.delta)}</td>
                                            <td>
                                                <span class=status_badge_class(s.status.code())>
                                                    {s.status.display_name()}
                                                </span>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </div>

            <PaginationControls
                current_page=Signal::derive(move || snapshot().page)
                total_pages=Signal::derive(move || snapshot().total_pages)
                total_count=Signal::derive(move || snapshot().total)
                page_size=Signal::derive(move || snapshot().per_page)
                on_page_change=Callback::new(move |page| {
                    ctrl.with_value(|c| c.set_page(page));
                    run_fetch();
                })
                on_page_size_change=Callback::new(move |size| {
                    ctrl.with_value(|c| c.set_per_page(size));
                    run_fetch();
                })
            />
        </div>
    }
}
