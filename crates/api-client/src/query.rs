//! Generic filter/pagination engine behind every list page.
//!
//! One [`QueryController`] instance owns one resource listing's state;
//! resource specifics (endpoint, parameter names, response shape) come
//! from a [`ResourceQuery`] configuration type, so payments,
//! disbursements and settlements share the same engine instead of
//! repeating it.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use chrono::{Local, NaiveDate, NaiveTime};
use contracts::common::page::PageMeta;

use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;

pub const DEFAULT_PER_PAGE: u32 = 20;

/// Dates travel as local wall-clock minutes, `2024-01-01T23:59`.
const DATE_PARAM_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Named filter state of one listing. `None` means "not filtered" and is
/// never serialized into a request parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    pub status: Option<String>,
    pub merchant_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub currency_id: Option<i64>,
    pub order_no: Option<String>,
    pub third_party_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for FilterSet {
    /// Fresh listing shows today's records: start date = today, no other
    /// filters.
    fn default() -> Self {
        Self {
            status: None,
            merchant_id: None,
            provider_id: None,
            payment_method_id: None,
            currency_id: None,
            order_no: None,
            third_party_id: None,
            start_date: Some(Local::now().date_naive()),
            end_date: None,
        }
    }
}

/// One filter change. Text values are trimmed; empty text and the UI's
/// "all" sentinel both arrive here as `None`.
#[derive(Debug, Clone)]
pub enum Filter {
    Status(Option<String>),
    Merchant(Option<i64>),
    Provider(Option<i64>),
    PaymentMethod(Option<i64>),
    Currency(Option<i64>),
    OrderNo(Option<String>),
    ThirdPartyId(Option<String>),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl FilterSet {
    pub fn apply(&mut self, change: Filter) {
        match change {
            Filter::Status(v) => self.status = normalize_text(v),
            Filter::Merchant(v) => self.merchant_id = v,
            Filter::Provider(v) => self.provider_id = v,
            Filter::PaymentMethod(v) => self.payment_method_id = v,
            Filter::Currency(v) => self.currency_id = v,
            Filter::OrderNo(v) => self.order_no = normalize_text(v),
            Filter::ThirdPartyId(v) => self.third_party_id = normalize_text(v),
            Filter::StartDate(v) => self.start_date = v,
            Filter::EndDate(v) => self.end_date = v,
        }
    }

    /// Serialize present filters under the resource's parameter names.
    ///
    /// The date range is inclusive of both whole days: start at local
    /// midnight, end at 23:59:59.999. That asymmetry is what makes a
    /// same-day range return the full day's records.
    pub fn serialize_into(&self, names: &FilterParams, out: &mut Vec<(String, String)>) {
        if let Some(v) = &self.status {
            out.push((names.status.to_string(), v.clone()));
        }
        if let Some(v) = self.merchant_id {
            out.push((names.merchant_id.to_string(), v.to_string()));
        }
        if let Some(v) = self.provider_id {
            out.push((names.provider_id.to_string(), v.to_string()));
        }
        if let Some(v) = self.payment_method_id {
            out.push((names.payment_method_id.to_string(), v.to_string()));
        }
        if let Some(v) = self.currency_id {
            out.push((names.currency_id.to_string(), v.to_string()));
        }
        if let Some(v) = &self.order_no {
            out.push((names.order_no.to_string(), v.clone()));
        }
        if let Some(v) = &self.third_party_id {
            out.push((names.third_party_id.to_string(), v.clone()));
        }
        if let Some(d) = self.start_date {
            let start = d.and_time(NaiveTime::MIN);
            out.push((
                names.start_date.to_string(),
                start.format(DATE_PARAM_FORMAT).to_string(),
            ));
        }
        if let Some(d) = self.end_date {
            let end = d.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time"));
            out.push((
                names.end_date.to_string(),
                end.format(DATE_PARAM_FORMAT).to_string(),
            ));
        }
    }
}

/// Request parameter names for each filter key. Resources override
/// individual names where the backend deviates (payments call the status
/// parameter `order_status`).
#[derive(Debug, Clone, Copy)]
pub struct FilterParams {
    pub status: &'static str,
    pub merchant_id: &'static str,
    pub provider_id: &'static str,
    pub payment_method_id: &'static str,
    pub currency_id: &'static str,
    pub order_no: &'static str,
    pub third_party_id: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
}

impl FilterParams {
    pub const DEFAULT: FilterParams = FilterParams {
        status: "status",
        merchant_id: "merchant_id",
        provider_id: "provider_id",
        payment_method_id: "payment_method_id",
        currency_id: "currency_id",
        order_no: "order_no",
        third_party_id: "third_party_id",
        start_date: "start_date",
        end_date: "end_date",
    };
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Normalized page of server results.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

impl<T> Paged<T> {
    pub fn from_parts(items: Vec<T>, meta: &PageMeta) -> Self {
        Self {
            items,
            total: meta.total,
            total_pages: meta.total_pages,
        }
    }
}

/// Per-resource configuration consumed by the generic controller.
pub trait ResourceQuery {
    type Item: Clone + 'static;
    /// Server-computed rollups delivered next to the page. Pass-through
    /// values: the page alone could never reproduce them.
    type Stats: Clone + Default + 'static;

    /// Verb phrase for error messages, e.g. "load payments".
    const ACTION: &'static str;
    const ENDPOINT: &'static str;
    const PARAMS: FilterParams;

    fn decode_page(body: &str) -> Result<(Paged<Self::Item>, Self::Stats), ApiError>;
}

struct QueryState<R: ResourceQuery> {
    filters: FilterSet,
    page: u32,
    per_page: u32,
    loading: bool,
    /// Sequence number of the most recently issued fetch. Responses
    /// carrying an older number are discarded, so a slow stale fetch can
    /// never overwrite a newer result.
    seq: u64,
    result: Paged<R::Item>,
    stats: R::Stats,
    error: Option<ApiError>,
}

/// Owning view of one listing for rendering. Produced by
/// [`QueryController::snapshot`]; the error is already classified into a
/// user-facing message.
pub struct QuerySnapshot<R: ResourceQuery> {
    pub items: Vec<R::Item>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u32,
    pub per_page: u32,
    pub loading: bool,
    pub filters: FilterSet,
    pub stats: R::Stats,
    pub error: Option<String>,
}

impl<R: ResourceQuery> Clone for QuerySnapshot<R> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            total: self.total,
            total_pages: self.total_pages,
            page: self.page,
            per_page: self.per_page,
            loading: self.loading,
            filters: self.filters.clone(),
            stats: self.stats.clone(),
            error: self.error.clone(),
        }
    }
}

pub struct QueryController<R: ResourceQuery> {
    gateway: Rc<GatewayClient>,
    state: RefCell<QueryState<R>>,
    on_change: RefCell<Option<Box<dyn Fn()>>>,
}

impl<R: ResourceQuery> QueryController<R> {
    pub fn new(gateway: Rc<GatewayClient>) -> Rc<Self> {
        Rc::new(Self {
            gateway,
            state: RefCell::new(QueryState {
                filters: FilterSet::default(),
                page: 1,
                per_page: DEFAULT_PER_PAGE,
                loading: false,
                seq: 0,
                result: Paged::default(),
                stats: R::Stats::default(),
                error: None,
            }),
            on_change: RefCell::new(None),
        })
    }

    /// Register the render-invalidation callback (one per controller).
    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Box::new(callback));
    }

    fn notify(&self) {
        if let Some(callback) = self.on_change.borrow().as_ref() {
            callback();
        }
    }

    /// Any filter change returns the listing to its first page.
    pub fn set_filter(&self, change: Filter) {
        {
            let mut st = self.state.borrow_mut();
            st.filters.apply(change);
            st.page = 1;
        }
        self.notify();
    }

    /// No clamping: the pagination UI only offers valid pages, and an
    /// out-of-range page simply comes back empty from the server.
    pub fn set_page(&self, page: u32) {
        self.state.borrow_mut().page = page;
        self.notify();
    }

    pub fn set_per_page(&self, per_page: u32) {
        {
            let mut st = self.state.borrow_mut();
            st.per_page = per_page;
            st.page = 1;
        }
        self.notify();
    }

    pub fn clear_filters(&self) {
        {
            let mut st = self.state.borrow_mut();
            st.filters = FilterSet::default();
            st.page = 1;
        }
        self.notify();
    }

    /// Re-issue the current filter set and page without modification.
    pub fn refresh(&self) -> impl Future<Output = ()> + '_ {
        self.fetch()
    }

    fn build_request(state: &QueryState<R>) -> ApiRequest {
        let mut request = ApiRequest::get(R::ENDPOINT);
        request.push_query("page", state.page.to_string());
        request.push_query("per_page", state.per_page.to_string());
        state
            .filters
            .serialize_into(&R::PARAMS, &mut request.query);
        request
    }

    /// Issue the current state. The sequence number is taken synchronously
    /// at the call, so "latest issued" is well defined even when callers
    /// overlap fetches.
    pub fn fetch(&self) -> impl Future<Output = ()> + '_ {
        let (seq, request) = {
            let mut st = self.state.borrow_mut();
            st.seq += 1;
            st.loading = true;
            (st.seq, Self::build_request(&st))
        };
        self.notify();

        async move {
            log::debug!("GET {} (seq {})", R::ENDPOINT, seq);
            let outcome = match self.gateway.send(request).await {
                Ok(response) if response.is_success() => R::decode_page(&response.body),
                Ok(response) => Err(ApiError::from_response(response.status, &response.body)),
                Err(err) => Err(err),
            };

            {
                let mut st = self.state.borrow_mut();
                if seq != st.seq {
                    log::debug!("discarding stale response for {} (seq {})", R::ENDPOINT, seq);
                    return;
                }
                // Settles on every path: success, classified failure,
                // transport failure.
                st.loading = false;
                match outcome {
                    Ok((result, stats)) => {
                        st.result = result;
                        st.stats = stats;
                        st.error = None;
                    }
                    Err(err) => {
                        log::error!("GET {} failed: {}", R::ENDPOINT, err);
                        // Never stale rows next to an error banner.
                        st.result = Paged::default();
                        st.stats = R::Stats::default();
                        st.error = Some(err);
                    }
                }
            }
            self.notify();
        }
    }

    pub fn snapshot(&self) -> QuerySnapshot<R> {
        let st = self.state.borrow();
        QuerySnapshot {
            items: st.result.items.clone(),
            total: st.result.total,
            total_pages: st.result.total_pages,
            page: st.page,
            per_page: st.per_page,
            loading: st.loading,
            filters: st.filters.clone(),
            stats: st.stats.clone(),
            error: st.error.as_ref().map(|e| e.user_message(R::ACTION)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::{Local, NaiveDate};
    use contracts::common::page::PageMeta;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::testing::{test_gateway, MockTransport};

    /// Minimal resource with default parameter names.
    struct Orders;

    impl ResourceQuery for Orders {
        type Item = String;
        type Stats = u64;

        const ACTION: &'static str = "load orders";
        const ENDPOINT: &'static str = "/orders";
        const PARAMS: FilterParams = FilterParams::DEFAULT;

        fn decode_page(body: &str) -> Result<(Paged<String>, u64), ApiError> {
            #[derive(serde::Deserialize)]
            struct Body {
                orders: Vec<String>,
                #[serde(flatten)]
                meta: PageMeta,
                #[serde(default)]
                checksum: u64,
            }
            let body: Body =
                serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok((Paged::from_parts(body.orders, &body.meta), body.checksum))
        }
    }

    fn controller() -> (Rc<MockTransport>, Rc<QueryController<Orders>>) {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = Rc::new(test_gateway(&transport, &storage, Rc::new(|| {})));
        (transport, QueryController::<Orders>::new(gateway))
    }

    fn page_body(items: &[&str], total: u64, total_pages: u64) -> String {
        serde_json::json!({
            "orders": items,
            "total": total,
            "page": 1,
            "per_page": 20,
            "total_pages": total_pages,
            "checksum": 5
        })
        .to_string()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn absent_and_empty_filters_are_never_serialized() {
        let mut filters = FilterSet::default();
        filters.start_date = None;
        filters.apply(Filter::Status(Some("  ".to_string())));
        filters.apply(Filter::OrderNo(Some(String::new())));

        let mut params = Vec::new();
        filters.serialize_into(&FilterParams::DEFAULT, &mut params);
        assert!(params.is_empty());
    }

    #[test]
    fn setting_any_filter_resets_to_first_page() {
        let (_, ctrl) = controller();
        ctrl.set_page(14);
        assert_eq!(ctrl.snapshot().page, 14);

        ctrl.set_filter(Filter::Status(Some("pending".to_string())));
        assert_eq!(ctrl.snapshot().page, 1);
    }

    #[test]
    fn clear_filters_restores_the_exact_default_state() {
        let (_, ctrl) = controller();
        ctrl.set_filter(Filter::Merchant(Some(3)));
        ctrl.set_filter(Filter::EndDate(Some(date(2024, 6, 1))));
        ctrl.set_page(9);

        ctrl.clear_filters();
        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.filters, FilterSet::default());
        assert_eq!(
            snapshot.filters.start_date,
            Some(Local::now().date_naive())
        );
        assert_eq!(snapshot.filters.end_date, None);
    }

    #[test]
    fn date_range_is_inclusive_of_the_full_end_day() {
        let mut filters = FilterSet::default();
        filters.start_date = Some(date(2024, 1, 1));
        filters.end_date = Some(date(2024, 1, 1));

        let mut params = Vec::new();
        filters.serialize_into(&FilterParams::DEFAULT, &mut params);
        assert_eq!(
            params,
            vec![
                ("start_date".to_string(), "2024-01-01T00:00".to_string()),
                ("end_date".to_string(), "2024-01-01T23:59".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn request_parameters_contain_exactly_the_present_filters() {
        let (transport, ctrl) = controller();
        ctrl.set_filter(Filter::StartDate(Some(date(2024, 1, 1))));
        ctrl.set_filter(Filter::EndDate(Some(date(2024, 1, 1))));
        ctrl.set_filter(Filter::Status(Some("pending".to_string())));
        ctrl.set_filter(Filter::Currency(Some(2)));

        transport.push_ok(200, &page_body(&[], 0, 0));
        ctrl.fetch().await;

        let mut query = transport.take_requests()[0].query.clone();
        query.sort();
        let mut expected = vec![
            ("page".to_string(), "1".to_string()),
            ("per_page".to_string(), "20".to_string()),
            ("status".to_string(), "pending".to_string()),
            ("currency_id".to_string(), "2".to_string()),
            ("start_date".to_string(), "2024-01-01T00:00".to_string()),
            ("end_date".to_string(), "2024-01-01T23:59".to_string()),
        ];
        expected.sort();
        assert_eq!(query, expected);
    }

    #[tokio::test]
    async fn success_replaces_result_and_stats_wholesale() {
        let (transport, ctrl) = controller();
        transport.push_ok(200, &page_body(&["a", "b"], 42, 3));
        ctrl.fetch().await;

        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.items, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(snapshot.total, 42);
        assert_eq!(snapshot.total_pages, 3);
        assert_eq!(snapshot.stats, 5);
        assert_eq!(snapshot.error, None);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn failure_clears_the_page_wholesale() {
        let (transport, ctrl) = controller();
        transport.push_ok(200, &page_body(&["a", "b"], 42, 3));
        ctrl.fetch().await;

        transport.push_ok(403, r#"{"detail": "Missing admin permission: orders.view"}"#);
        ctrl.fetch().await;

        let snapshot = ctrl.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.total_pages, 0);
        assert_eq!(snapshot.stats, 0);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("You don't have permission to load orders (orders.view)")
        );
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn transport_failure_also_settles_the_loading_flag() {
        let (transport, ctrl) = controller();
        transport.push_network_error("connection refused");
        ctrl.fetch().await;

        let snapshot = ctrl.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Failed to load orders. Please try again.")
        );
    }

    #[tokio::test]
    async fn stale_responses_are_discarded() {
        let (transport, ctrl) = controller();
        // Issue two overlapping fetches; the transport answers them in
        // poll order, so the superseded one resolves first.
        let stale = ctrl.fetch();
        let latest = ctrl.fetch();

        transport.push_ok(200, &page_body(&["old"], 1, 1));
        stale.await;
        // The stale settle must not release the newer fetch's flag.
        assert!(ctrl.snapshot().loading);
        assert!(ctrl.snapshot().items.is_empty());

        transport.push_ok(200, &page_body(&["new"], 1, 1));
        latest.await;
        let snapshot = ctrl.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.items, vec!["new".to_string()]);
    }

    #[tokio::test]
    async fn refresh_reissues_the_current_state_unmodified() {
        let (transport, ctrl) = controller();
        ctrl.set_filter(Filter::Status(Some("pending".to_string())));
        ctrl.set_page(3);

        transport.push_ok(200, &page_body(&[], 0, 0));
        ctrl.refresh().await;
        transport.push_ok(200, &page_body(&[], 0, 0));
        ctrl.refresh().await;

        let sent = transport.take_requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].query, sent[1].query);
        assert!(sent[1]
            .query
            .contains(&("page".to_string(), "3".to_string())));
        assert!(sent[1]
            .query
            .contains(&("status".to_string(), "pending".to_string())));
    }

    #[tokio::test]
    async fn success_after_failure_clears_the_error() {
        let (transport, ctrl) = controller();
        transport.push_ok(500, "");
        ctrl.fetch().await;
        assert!(ctrl.snapshot().error.is_some());

        transport.push_ok(200, &page_body(&["a"], 1, 1));
        ctrl.fetch().await;
        assert_eq!(ctrl.snapshot().error, None);
    }

    #[tokio::test]
    async fn notifies_on_every_state_transition() {
        use std::cell::Cell;

        let (transport, ctrl) = controller();
        let notifications = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&notifications);
        ctrl.set_on_change(move || counter.set(counter.get() + 1));

        ctrl.set_filter(Filter::Merchant(Some(1)));
        assert_eq!(notifications.get(), 1);

        transport.push_ok(200, &page_body(&[], 0, 0));
        ctrl.fetch().await;
        // Once on fetch start, once on settle.
        assert_eq!(notifications.get(), 3);
    }

    #[tokio::test]
    async fn bearer_header_rides_along_on_list_requests() {
        // Wiring check: the controller goes through the gateway pipeline.
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        storage.set(crate::session::ACCESS_TOKEN_KEY, "tok-1");
        let gateway = Rc::new(test_gateway(&transport, &storage, Rc::new(|| {})));
        let ctrl = QueryController::<Orders>::new(gateway);

        transport.push_ok(200, &page_body(&[], 0, 0));
        ctrl.fetch().await;

        let sent = transport.take_requests();
        assert_eq!(
            sent[0].headers,
            vec![("Authorization".to_string(), "Bearer tok-1".to_string())]
        );
    }
}
