//! crates/book_review_core/src/list_sync.rs
//!
//! Keeps the review list in step with the pagination state.
//!
//! Every fetch is tagged with the offset it was issued for and a generation
//! number. A completion is applied only when it is the most recently issued
//! fetch *and* its offset still matches the current pagination offset; anything
//! else is stale and is dropped. Requests are never cancelled.

use crate::domain::{ListStatus, ListViewState, PaginationState, ReviewRecord};
use crate::gateway::{Gateway, GatewayError, GatewayResult};
use crate::ports::HttpMethod;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const LIST_FAILED: &str = "failed to load book reviews";
pub const LIST_AUTH_FAILED: &str = "failed to load book reviews: please log in again";

/// Identifies one issued list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub offset: u32,
    pub generation: u64,
    /// Whether the fetch went to the authenticated listing.
    pub authenticated: bool,
}

impl FetchTicket {
    pub fn path(&self) -> String {
        if self.authenticated {
            format!("/books?offset={}", self.offset)
        } else {
            format!("/public/books?offset={}", self.offset)
        }
    }
}

/// A resolved list fetch, waiting to be reconciled.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: GatewayResult<Vec<ReviewRecord>>,
}

pub struct ListSync {
    gateway: Gateway,
    view: watch::Sender<ListViewState>,
    latest: u64,
}

impl ListSync {
    /// The view starts out `Loading` the first page; the first fetch is issued by
    /// [`ListSync::begin`] or by the driver loop.
    pub fn new(gateway: Gateway) -> Self {
        let (view, _) = watch::channel(ListViewState::loading(0));
        Self {
            gateway,
            view,
            latest: 0,
        }
    }

    pub fn view(&self) -> ListViewState {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.view.subscribe()
    }

    /// Registers a new fetch for `offset` and resets the view to `Loading`.
    ///
    /// The listing variant is chosen now: the authenticated path when a token is
    /// stored, the public one otherwise.
    pub fn begin(&mut self, offset: u32) -> FetchTicket {
        self.latest += 1;
        let ticket = FetchTicket {
            offset,
            generation: self.latest,
            authenticated: self.gateway.credentials().get_token().is_some(),
        };
        debug!(
            offset,
            generation = ticket.generation,
            authenticated = ticket.authenticated,
            "Issuing review list fetch"
        );
        self.view.send_replace(ListViewState::loading(offset));
        ticket
    }

    /// The network half of a fetch. Owns everything it needs, so several can be in
    /// flight at once.
    pub fn fetch(&self, ticket: FetchTicket) -> BoxFuture<'static, FetchCompletion> {
        let gateway = self.gateway.clone();
        Box::pin(async move {
            let result = gateway
                .call_json::<Vec<ReviewRecord>>(HttpMethod::Get, &ticket.path(), None)
                .await;
            FetchCompletion { ticket, result }
        })
    }

    /// Reconciles a completed fetch against the current pagination state.
    /// Returns whether the view changed.
    pub fn apply(&mut self, completion: FetchCompletion, current: &PaginationState) -> bool {
        let FetchCompletion { ticket, result } = completion;
        if ticket.generation != self.latest || ticket.offset != current.offset {
            debug!(
                offset = ticket.offset,
                generation = ticket.generation,
                current_offset = current.offset,
                "Discarding stale review list response"
            );
            return false;
        }

        let next = match result {
            Ok(records) => {
                info!(offset = ticket.offset, count = records.len(), "Review list loaded");
                ListViewState {
                    offset: ticket.offset,
                    records,
                    status: ListStatus::Ready,
                }
            }
            Err(e) => {
                warn!(offset = ticket.offset, "Review list fetch failed: {}", e);
                let message = match e {
                    GatewayError::Unauthorized => {
                        // The token was refused; a fresh login must not find it again.
                        if ticket.authenticated {
                            self.gateway.expire_session();
                        }
                        LIST_AUTH_FAILED
                    }
                    _ => LIST_FAILED,
                };
                ListViewState {
                    offset: ticket.offset,
                    records: Vec::new(),
                    status: ListStatus::Failed(message.to_string()),
                }
            }
        };
        self.view.send_replace(next);
        true
    }

    /// Fetches the page for `current` and applies it in one step.
    pub async fn refresh(&mut self, current: &PaginationState) -> ListViewState {
        let ticket = self.begin(current.offset);
        let completion = self.fetch(ticket).await;
        self.apply(completion, current);
        self.view()
    }

    /// Drives the list from pagination changes until the pagination side goes away.
    ///
    /// Fetches for superseded offsets keep running; their results are discarded
    /// when they arrive.
    pub async fn run(mut self, mut pagination: watch::Receiver<PaginationState>) {
        let mut in_flight = FuturesUnordered::new();

        let initial = *pagination.borrow_and_update();
        let ticket = self.begin(initial.offset);
        in_flight.push(self.fetch(ticket));

        loop {
            tokio::select! {
                changed = pagination.changed() => {
                    if changed.is_err() {
                        debug!("Pagination closed; stopping review list synchronization");
                        break;
                    }
                    let state = *pagination.borrow_and_update();
                    let ticket = self.begin(state.offset);
                    in_flight.push(self.fetch(ticket));
                }
                Some(completion) = in_flight.next(), if !in_flight.is_empty() => {
                    let current = *pagination.borrow();
                    self.apply(completion, &current);
                }
            }
        }
    }

    /// A handle for logging record selections, usable after `run` took `self`.
    pub fn view_log(&self) -> ViewLog {
        ViewLog {
            gateway: self.gateway.clone(),
        }
    }
}

/// Best-effort reporting of which review the user opened.
#[derive(Clone)]
pub struct ViewLog {
    gateway: Gateway,
}

impl ViewLog {
    /// Records that a review was opened. Fire-and-forget: the returned handle
    /// may be dropped, and failures are only logged.
    pub fn record_selected(&self, review_id: &str) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let review_id = review_id.to_string();
        tokio::spawn(async move {
            if gateway.credentials().get_token().is_none() {
                warn!(review_id = %review_id, "Not logged in; skipping view log");
                return;
            }
            let body = json!({ "selectBookId": review_id });
            match gateway.call(HttpMethod::Post, "/logs", Some(body)).await {
                Ok(_) => debug!(review_id = %review_id, "View logged"),
                Err(e) => warn!(review_id = %review_id, "Failed to log view: {}", e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialStore, InMemoryStorage};
    use crate::pagination::Pagination;
    use crate::testing::{reviews_json, StubTransport};
    use std::sync::Arc;
    use std::time::Duration;

    fn list_sync(transport: &Arc<StubTransport>) -> ListSync {
        let credentials = CredentialStore::new(Arc::new(InMemoryStorage::new()));
        ListSync::new(Gateway::new(transport.clone(), credentials))
    }

    fn ids(view: &ListViewState) -> Vec<&str> {
        view.records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn anonymous_refresh_uses_public_listing() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/public/books?offset=0", 200, &reviews_json("p1", 2));
        let mut sync = list_sync(&transport);

        let view = sync.refresh(&PaginationState::default()).await;

        assert_eq!(view.status, ListStatus::Ready);
        assert_eq!(ids(&view), vec!["p1-0", "p1-1"]);
        assert_eq!(transport.requests()[0].bearer_token, None);
    }

    #[tokio::test]
    async fn authenticated_refresh_uses_private_listing_with_bearer() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(
            HttpMethod::Get,
            "/books?offset=0",
            200,
            r#"[{"id":"1","title":"T","url":"u","detail":"d","review":"r","reviewer":"Taro","isMine":true}]"#,
        );
        let mut sync = list_sync(&transport);
        sync.gateway.credentials().set_session("abc", Some("Taro")).unwrap();

        let view = sync.refresh(&PaginationState::default()).await;

        assert_eq!(view.records[0].is_mine, Some(true));
        let requests = transport.requests();
        assert_eq!(requests[0].path, "/books?offset=0");
        assert_eq!(requests[0].bearer_token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn empty_page_is_ready_not_failed() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/public/books?offset=20", 200, "[]");
        let mut sync = list_sync(&transport);
        let page_three = PaginationState {
            current_page: 3,
            offset: 20,
        };

        let view = sync.refresh(&page_three).await;

        assert_eq!(view.status, ListStatus::Ready);
        assert!(view.records.is_empty());
        assert_eq!(view.page(), 3);
    }

    #[tokio::test]
    async fn failure_clears_records() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/public/books?offset=0", 200, &reviews_json("p1", 1));
        let mut sync = list_sync(&transport);
        let first = PaginationState::default();
        sync.refresh(&first).await;

        transport.respond(HttpMethod::Get, "/public/books?offset=0", 500, "");
        let view = sync.refresh(&first).await;

        assert_eq!(view.status, ListStatus::Failed(LIST_FAILED.to_string()));
        assert!(view.records.is_empty());
    }

    #[tokio::test]
    async fn rejected_token_is_forgotten() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/books?offset=0", 401, "");
        transport.respond(HttpMethod::Get, "/public/books?offset=0", 200, &reviews_json("p1", 1));
        let mut sync = list_sync(&transport);
        sync.gateway.credentials().set_session("stale", Some("Taro")).unwrap();

        let view = sync.refresh(&PaginationState::default()).await;
        assert_eq!(view.status, ListStatus::Failed(LIST_AUTH_FAILED.to_string()));
        assert_eq!(sync.gateway.credentials().get_token(), None);
        assert_eq!(sync.gateway.credentials().display_name(), None);

        // The next fetch goes out anonymously.
        let view = sync.refresh(&PaginationState::default()).await;
        assert_eq!(view.status, ListStatus::Ready);
        assert_eq!(transport.paths()[1], "/public/books?offset=0");
    }

    #[tokio::test]
    async fn begin_resets_to_loading() {
        let transport = Arc::new(StubTransport::new());
        let mut sync = list_sync(&transport);

        sync.begin(10);

        assert_eq!(sync.view(), ListViewState::loading(10));
    }

    #[tokio::test]
    async fn late_response_for_superseded_offset_is_discarded() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/public/books?offset=0", 200, &reviews_json("p1", 10));
        transport.respond(HttpMethod::Get, "/public/books?offset=10", 200, &reviews_json("p2", 3));
        let pagination = Pagination::new();
        let mut sync = list_sync(&transport);

        let first = sync.begin(pagination.offset());
        let first = sync.fetch(first);
        pagination.next();
        let second = sync.begin(pagination.offset());
        let second = sync.fetch(second);

        // The second page resolves first.
        let second = second.await;
        let first = first.await;
        assert!(sync.apply(second, &pagination.state()));
        assert!(!sync.apply(first, &pagination.state()));

        let view = sync.view();
        assert_eq!(view.offset, 10);
        assert_eq!(view.status, ListStatus::Ready);
        assert_eq!(ids(&view), vec!["p2-0", "p2-1", "p2-2"]);
    }

    #[tokio::test]
    async fn earlier_fetch_for_same_offset_is_discarded() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Get, "/public/books?offset=0", 200, &reviews_json("p1", 1));
        transport.respond(HttpMethod::Get, "/public/books?offset=10", 200, &reviews_json("p2", 1));
        let pagination = Pagination::new();
        let mut sync = list_sync(&transport);

        let stale = sync.begin(0);
        let stale = sync.fetch(stale).await;
        pagination.next();
        let _abandoned = sync.begin(10);
        pagination.prev();
        let fresh = sync.begin(0);
        let fresh = sync.fetch(fresh).await;

        assert!(!sync.apply(stale, &pagination.state()));
        assert_eq!(sync.view().status, ListStatus::Loading);
        assert!(sync.apply(fresh, &pagination.state()));
        assert_eq!(sync.view().status, ListStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn run_keeps_the_newest_page_when_responses_arrive_out_of_order() {
        let transport = Arc::new(StubTransport::new());
        transport.respond_after(
            HttpMethod::Get,
            "/public/books?offset=0",
            200,
            &reviews_json("p1", 10),
            Duration::from_millis(300),
        );
        transport.respond_after(
            HttpMethod::Get,
            "/public/books?offset=10",
            200,
            &reviews_json("p2", 10),
            Duration::from_millis(200),
        );
        transport.respond_after(
            HttpMethod::Get,
            "/public/books?offset=20",
            200,
            &reviews_json("p3", 4),
            Duration::from_millis(100),
        );
        let pagination = Pagination::new();
        let sync = list_sync(&transport);
        let mut view = sync.subscribe();
        let driver = tokio::spawn(sync.run(pagination.subscribe()));

        // Let the driver issue the first-page fetch before paging forward twice.
        tokio::task::yield_now().await;
        pagination.next();
        tokio::task::yield_now().await;
        pagination.next();

        let ready = view
            .wait_for(|v| v.status == ListStatus::Ready)
            .await
            .unwrap()
            .clone();
        assert_eq!(ready.offset, 20);
        assert_eq!(ready.records.len(), 4);

        // Let the slower, stale responses land.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let settled = view.borrow().clone();
        assert_eq!(settled.offset, 20);
        assert!(settled.records.iter().all(|r| r.id.starts_with("p3-")));
        assert_eq!(
            transport.paths(),
            vec![
                "/public/books?offset=0",
                "/public/books?offset=10",
                "/public/books?offset=20",
            ]
        );

        drop(pagination);
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn selecting_a_record_logs_the_view() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Post, "/logs", 200, "{}");
        let sync = list_sync(&transport);
        sync.gateway.credentials().set_session("abc", None).unwrap();

        sync.view_log().record_selected("42").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/logs");
        assert_eq!(requests[0].body, Some(json!({"selectBookId": "42"})));
    }

    #[tokio::test]
    async fn failed_view_log_does_not_propagate() {
        let transport = Arc::new(StubTransport::new());
        transport.respond(HttpMethod::Post, "/logs", 500, "");
        let sync = list_sync(&transport);
        sync.gateway.credentials().set_session("abc", None).unwrap();

        assert!(sync.view_log().record_selected("42").await.is_ok());
    }

    #[tokio::test]
    async fn view_log_is_skipped_when_logged_out() {
        let transport = Arc::new(StubTransport::new());
        let sync = list_sync(&transport);

        sync.view_log().record_selected("42").await.unwrap();

        assert!(transport.requests().is_empty());
    }
}
