//! Contact manager client core: remote store access, snapshot queries, view
//! reconciliation and the add/edit form workflow.

pub mod controller;
pub mod error;
pub mod form;
pub mod phone;
pub mod query;
pub mod store;
pub mod validation;
pub mod view_sync;

pub use controller::{
    events::{ControllerEvent, UiError, UiErrorCategory, UiErrorContext},
    ContactsController,
};
pub use error::StoreError;
pub use form::{FormError, FormOrchestrator, FormState, SubmitKind, SubmitOutcome};
pub use phone::{format_phone, is_canonical_phone, KeyOutcome, PhoneInput, PhoneKey};
pub use store::{ContactStore, HttpContactStore, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use validation::{ClientValidationError, Field, FieldError};
pub use view_sync::{BaseView, MainSurface, SearchResults, SearchSurface, ViewState, ViewSync};

#[cfg(test)]
mod tests;
