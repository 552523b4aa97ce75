pub mod credentials;
pub mod detail;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod list_sync;
pub mod pagination;
pub mod ports;
pub mod profile;
pub mod reviews;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use credentials::{CredentialStore, InMemoryStorage};
pub use detail::ReviewDetail;
pub use domain::{
    DetailStatus, ListStatus, ListViewState, PaginationState, ReviewDraft, ReviewRecord, Session,
    UserProfile, MAX_PAGE, PAGE_SIZE,
};
pub use error::{ActionError, ActionResult};
pub use gateway::{Gateway, GatewayError, GatewayResult};
pub use list_sync::{ListSync, ViewLog};
pub use pagination::Pagination;
pub use ports::{
    ApiRequest, ApiResponse, HttpMethod, HttpTransport, KeyValueStorage, PortError, PortResult,
};
pub use profile::ProfileEditor;
pub use reviews::ReviewEditor;
pub use session::{SessionController, SessionState};
