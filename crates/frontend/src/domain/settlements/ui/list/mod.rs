use std::rc::Rc;

use api_client::query::{Filter, QueryController};
use api_client::resources::refdata;
use api_client::resources::settlements::{self, SettlementsQuery};
use contracts::domain::refdata::{Currency, Merchant};
use contracts::domain::settlements::{Settlement, SettlementStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::StatCard;
use crate::shared::dialog::{confirm, prompt};
use crate::shared::export::{export_to_csv, CsvExportable};
use crate::shared::format::{
    format_amount, format_date, parse_date_input, parse_id_filter, status_badge_class,
};
use crate::system::auth::context::use_api;

impl CsvExportable for Settlement {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Merchant ID",
            "Currency ID",
            "Period Start",
            "Period End",
            "Gross",
            "Fees",
            "Net",
            "Status",
            "Reviewed By",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.merchant_id.to_string(),
            self.currency_id.to_string(),
            format_date(self.period_start),
            format_date(self.period_end),
            format_amount(&self.gross_amount),
            format_amount(&self.fee_amount),
            format_amount(&self.net_amount),
            self.status.code().to_string(),
            self.reviewed_by.clone().unwrap_or_default(),
        ]
    }
}

#[component]
pub fn SettlementsList() -> impl IntoView {
    let api = use_api();
    let ctrl = StoredValue::new_local(QueryController::<SettlementsQuery>::new(
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

    let (merchants, set_merchants) = signal(Vec::<Merchant>::new());
    let (currencies, set_currencies) = signal(Vec::<Currency>::new());
    spawn_local(async move {
        let gateway = api.with_value(|a| Rc::clone(&a.gateway));
        match refdata::fetch_merchants(&gateway).await {
            Ok(list) => set_merchants.set(list),
            Err(e) => log::error!("failed to load merchants: {}", e),
        }
        match refdata::fetch_currencies(&gateway).await {
            Ok(list) => set_currencies.set(list),
            Err(e) => log::error!("failed to load currencies: {}", e),
        }
    });

    let (action_message, set_action_message) = signal(Option::<String>::None);

    let approve = move |id: i64| {
        if !confirm("Approve this settlement?") {
            return;
        }
        spawn_local(async move {
            let gateway = api.with_value(|a| Rc::clone(&a.gateway));
            match settlements::approve_settlement(&gateway, id).await {
                Ok(s) => {
                    set_action_message.set(Some(format!("Settlement {} approved", s.id)));
                    let Some(c) = ctrl.try_get_value() else { return };
                    c.fetch().await;
                }
                Err(e) => set_action_message.set(Some(e.user_message("approve the settlement"))),
            }
        });
    };

    let reject = move |id: i64| {
        let Some(reason) = prompt("Rejection reason:") else {
            return;
        };
        spawn_local(async move {
            let gateway = api.with_value(|a| Rc::clone(&a.gateway));
            match settlements::reject_settlement(&gateway, id, &reason).await {
                Ok(s) => {
                    set_action_message.set(Some(format!("Settlement {} rejected", s.id)));
                    let Some(c) = ctrl.try_get_value() else { return };
                    c.fetch().await;
                }
                Err(e) => set_action_message.set(Some(e.user_message("reject the settlement"))),
            }
        });
    };

    let merchant_name = move |id: i64| {
        merchants
            .get()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
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
                <h2>"Settlements"</h2>
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
                            if let Err(e) = export_to_csv(&snap.items, "settlements.csv") {
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
                    {SettlementStatus::all()
                        .into_iter()
                        .map(|s| view! { <option value=s.code()>{s.display_name()}</option> })
                        .collect_view()}
                </select>
                <select
                    class="filter-select"
                    prop:value=move || {
                        snapshot().filters.merchant_id.map(|v| v.to_string()).unwrap_or_default()
                    }
                    on:change=move |ev| {
                        set_filter(Filter::Merchant(parse_id_filter(&event_target_value(&ev))))
                    }
                >
                    <option value="">"All merchants"</option>
                    {move || {
                        merchants
                            .get()
                            .into_iter()
                            .map(|m| view! { <option value=m.id.to_string()>{m.name.clone()}</option> })
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
                    label="Total net amount"
                    value=Signal::derive(move || format_amount(&snapshot().stats.total_net_amount))
                />
                {move || {
                    snapshot()
                        .stats
                        .status_stats
                        .into_iter()
                        .map(|b| {
                            view! {
                                <div class="stat-card">
                                    <div class="stat-card__label">{b.status.clone()}</div>
                                    <div class="stat-card__value">
                                        {format!("{} ({})", b.count, format_amount(&b.amount))}
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Merchant"</th>
                            <th>"Currency"</th>
                            <th>"Period"</th>
                            <th class="num">"Gross"</th>
                            <th class="num">"Fees"</th>
                            <th class="num">"Net"</th>
                            <th>"Status"</th>
                            <th>"Reviewed By"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let snap = snapshot();
                            snap.items
                                .into_iter()
                                .map(|s| {
                                    let can_review = s.status == SettlementStatus::Pending;
                                    let id = s.id;
                                    view! {
                                        <tr>
                                            <td>{s.id}</td>
                                            <td>{merchant_name(s.merchant_id)}</td>
                                            <td>{currency_code(s.currency_id)}</td>
                                            <td>
                                                {format!(
                                                    "{} - {}",
                                                    format_date(s.period_start),
                                                    format_date(s.period_end),
                                                )}
                                            </td>
                                            <td class="num">{format_amount(&s.gross_amount)}</td>
                                            <td class="num">{format_amount(&s.fee_amount)}</td>
                                            <td class="num">{format_amount(&s.net_amount)}</td>
                                            <td>
                                                <span class=status_badge_class(s.status.code())>
                                                    {s.status.display_name()}
                                                </span>
                                            </td>
                                            <td>{s.reviewed_by.clone().unwrap_or_else(|| "-".to_string())}</td>
                                            <td class="row-actions">
                                                {can_review
                                                    .then(|| {
                                                        view! {
                                                            <button
                                                                class="btn btn-small"
                                                                on:click=move |_| approve(id)
                                                            >
                                                                "Approve"
                                                            </button>
                                                            <button
                                                                class="btn btn-small btn-danger"
                                                                on:click=move |_| reject(id)
                                                            >
                                                                "Reject"
                                                            </button>
                                                        }
                                                    })}
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
