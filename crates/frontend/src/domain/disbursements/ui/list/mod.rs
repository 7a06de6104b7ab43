use std::rc::Rc;

use api_client::query::{Filter, QueryController};
use api_client::resources::disbursements::{self, DisbursementsQuery};
use api_client::resources::refdata;
use contracts::domain::disbursements::{Disbursement, DisbursementStatus};
use contracts::domain::refdata::{Currency, Merchant, Provider};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::stat_card::StatCard;
use crate::shared::dialog::confirm;
use crate::shared::export::{export_to_csv, CsvExportable};
use crate::shared::format::{
    format_amount, format_date, format_datetime, format_opt_datetime, parse_date_input,
    parse_id_filter, status_badge_class,
};
use crate::system::auth::context::use_api;

impl CsvExportable for Disbursement {
    fn headers() -> Vec<&'static str> {
        vec![
            "Order No",
            "Third Party ID",
            "Merchant ID",
            "Provider ID",
            "Currency ID",
            "Amount",
            "Fee",
            "Status",
            "Bank Account",
            "Created At",
            "Completed At",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.order_no.clone(),
            self.third_party_id.clone().unwrap_or_default(),
            self.merchant_id.to_string(),
            self.provider_id.to_string(),
            self.currency_id.to_string(),
            format_amount(&self.amount),
            format_amount(&self.fee),
            self.status.code().to_string(),
            self.bank_account_no.clone().unwrap_or_default(),
            format_datetime(&self.created_at),
            format_opt_datetime(&self.completed_at),
        ]
    }
}

#[component]
pub fn DisbursementsList() -> impl IntoView {
    let api = use_api();
    let ctrl = StoredValue::new_local(QueryController::<DisbursementsQuery>::new(
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
    let (providers, set_providers) = signal(Vec::<Provider>::new());
    let (currencies, set_currencies) = signal(Vec::<Currency>::new());
    spawn_local(async move {
        let gateway = api.with_value(|a| Rc::clone(&a.gateway));
        match refdata::fetch_merchants(&gateway).await {
            Ok(list) => set_merchants.set(list),
            Err(e) => log::error!("failed to load merchants: {}", e),
        }
        match refdata::fetch_providers(&gateway).await {
            Ok(list) => set_providers.set(list),
            Err(e) => log::error!("failed to load providers: {}", e),
        }
        match refdata::fetch_currencies(&gateway).await {
            Ok(list) => set_currencies.set(list),
            Err(e) => log::error!("failed to load currencies: {}", e),
        }
    });

    let (detail, set_detail) = signal(Option::<Disbursement>::None);
    let (action_message, set_action_message) = signal(Option::<String>::None);

    let open_detail = move |order_no: String| {
        spawn_local(async move {
            let gateway = api.with_value(|a| Rc::clone(&a.gateway));
            match disbursements::get_disbursement(&gateway, &order_no).await {
                Ok(d) => {
                    set_action_message.set(None);
                    set_detail.set(Some(d));
                }
                Err(e) => set_action_message.set(Some(e.user_message("load the disbursement"))),
            }
        });
    };

    let repush = move |order_no: String| {
        if !confirm("Push this disbursement order to the provider again?") {
            return;
        }
        spawn_local(async move {
            let gateway = api.with_value(|a| Rc::clone(&a.gateway));
            match disbursements::repush_disbursement_order(&gateway, &order_no).await {
                Ok(ack) => {
                    let message = ack
                        .message
                        .unwrap_or_else(|| format!("Order {} re-pushed", order_no));
                    set_action_message.set(Some(message));
                    let Some(c) = ctrl.try_get_value() else { return };
                    c.fetch().await;
                }
                Err(e) => set_action_message.set(Some(e.user_message("re-push the order"))),
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
                <h2>"Disbursements"</h2>
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
                            if let Err(e) = export_to_csv(&snap.items, "disbursements.csv") {
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
                    {DisbursementStatus::all()
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
                    type="text"
                    placeholder="Order no"
                    prop:value=move || snapshot().filters.order_no.clone().unwrap_or_default()
                    on:change=move |ev| set_filter(Filter::OrderNo(Some(event_target_value(&ev))))
                />
                <input
                    class="filter-input"
                    type="text"
                    placeholder="Third-party id"
                    prop:value=move || snapshot().filters.third_party_id.clone().unwrap_or_default()
                    on:change=move |ev| {
                        set_filter(Filter::ThirdPartyId(Some(event_target_value(&ev))))
                    }
                />
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

            {move || {
                detail
                    .get()
                    .map(|d| {
                        view! {
                            <div class="detail-card">
                                <div class="detail-card__header">
                                    <h3>{format!("Disbursement {}", d.order_no)}</h3>
                                    <button class="btn btn-small" on:click=move |_| set_detail.set(None)>
                                        "Close"
                                    </button>
                                </div>
                                <dl class="detail-card__grid">
                                    <dt>"Status"</dt>
                                    <dd>{d.status.display_name()}</dd>
                                    <dt>"Amount"</dt>
                                    <dd>{format_amount(&d.amount)}</dd>
                                    <dt>"Fee"</dt>
                                    <dd>{format_amount(&d.fee)}</dd>
                                    <dt>"Third-party id"</dt>
                                    <dd>{d.third_party_id.clone().unwrap_or_else(|| "-".to_string())}</dd>
                                    <dt>"Bank account"</dt>
                                    <dd>{d.bank_account_no.clone().unwrap_or_else(|| "-".to_string())}</dd>
                                    <dt>"Created"</dt>
                                    <dd>{format_datetime(&d.created_at)}</dd>
                                    <dt>"Completed"</dt>
                                    <dd>{format_opt_datetime(&d.completed_at)}</dd>
                                </dl>
                            </div>
                        }
                    })
            }}

            <div class="stat-row">
                <StatCard
                    label="Total amount"
                    value=Signal::derive(move || format_amount(&snapshot().stats.total_amount))
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
                            <th>"Order No"</th>
                            <th>"Third-party ID"</th>
                            <th>"Merchant"</th>
                            <th>"Provider"</th>
                            <th>"Currency"</th>
                            <th class="num">"Amount"</th>
                            <th class="num">"Fee"</th>
                            <th>"Status"</th>
                            <th>"Created"</th>
                            <th>"Completed"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let snap = snapshot();
                            snap.items
                                .into_iter()
                                .map(|d| {
                                    let order_for_detail = d.order_no.clone();
                                    let order_for_repush = d.order_no.clone();
                                    let can_repush = matches!(
                                        d.status,
                                        DisbursementStatus::Pending | DisbursementStatus::Failed
                                    );
                                    view! {
                                        <tr>
                                            <td>
                                                <button
                                                    class="link"
                                                    on:click=move |_| open_detail(order_for_detail.clone())
                                                >
                                                    {d.order_no.clone()}
                                                </button>
                                            </td>
                                            <td>{d.third_party_id.clone().unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{merchant_name(d.merchant_id)}</td>
                                            <td>{provider_name(d.provider_id)}</td>
                                            <td>{currency_code(d.currency_id)}</td>
                                            <td class="num">{format_amount(&d.amount)}</td>
                                            <td class="num">{format_amount(&d.fee)}</td>
                                            <td>
                                                <span class=status_badge_class(d.status.code())>
                                                    {d.status.display_name()}
                                                </span>
                                            </td>
                                            <td>{format_datetime(&d.created_at)}</td>
                                            <td>{format_opt_datetime(&d.completed_at)}</td>
                                            <td class="row-actions">
                                                {can_repush
                                                    .then(|| {
                                                        view! {
                                                            <button
                                                                class="btn btn-small"
                                                                on:click=move |_| repush(order_for_repush.clone())
                                                            >
                                                                "Re-push"
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
