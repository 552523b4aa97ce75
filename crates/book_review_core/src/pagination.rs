//! crates/book_review_core/src/pagination.rs
//!
//! The pagination state machine. Transitions are synchronous and pure; observers
//! receive each new state through a `watch` channel.

use crate::domain::{PaginationState, PAGE_SIZE};
use tokio::sync::watch;
use tracing::debug;

pub struct Pagination {
    state: watch::Sender<PaginationState>,
}

impl Pagination {
    /// Starts at page 1, offset 0.
    pub fn new() -> Self {
        Self::at_page(1)
    }

    /// Starts at `page`, clamped to the addressable range.
    pub fn at_page(page: u32) -> Self {
        let (state, _) = watch::channel(PaginationState::at_page(page));
        Self { state }
    }

    pub fn state(&self) -> PaginationState {
        *self.state.borrow()
    }

    pub fn offset(&self) -> u32 {
        self.state.borrow().offset
    }

    /// A receiver that is notified after every transition that changed the state.
    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.state.subscribe()
    }

    /// Advances one page. The server decides when pages run out; the only local
    /// limit is `MAX_PAGE`, where this is a no-op without notification.
    pub fn next(&self) -> PaginationState {
        let moved = self.state.send_if_modified(|state| {
            match (state.current_page.checked_add(1), state.offset.checked_add(PAGE_SIZE)) {
                (Some(page), Some(offset)) => {
                    state.current_page = page;
                    state.offset = offset;
                    true
                }
                _ => false,
            }
        });
        let state = self.state();
        if moved {
            debug!(page = state.current_page, offset = state.offset, "Pagination advanced");
        }
        state
    }

    /// Goes back one page. No-op, and no notification, on the first page.
    pub fn prev(&self) -> PaginationState {
        let moved = self.state.send_if_modified(|state| {
            if state.current_page <= 1 {
                return false;
            }
            state.current_page -= 1;
            state.offset -= PAGE_SIZE;
            true
        });
        let state = self.state();
        if moved {
            debug!(page = state.current_page, offset = state.offset, "Pagination retreated");
        }
        state
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}
