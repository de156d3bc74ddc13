//! Events published by the controller and user-facing error modeling.

use thiserror::Error;

use crate::{error::StoreError, form::FormError, view_sync::ViewState};

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    ViewChanged(ViewState),
    Notice(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    NotFound,
    Validation,
    Transport,
    Timeout,
    Server,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    OpenForm,
    Submit,
    Delete,
    TagFilter,
    Search,
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_store(context: UiErrorContext, err: &StoreError) -> Self {
        let category = match err {
            StoreError::NotFound(_) => UiErrorCategory::NotFound,
            StoreError::Validation(_) => UiErrorCategory::Validation,
            StoreError::Timeout => UiErrorCategory::Timeout,
            StoreError::Network(_) | StoreError::InvalidBaseUrl(_) => UiErrorCategory::Transport,
            StoreError::Status { .. } | StoreError::Decode(_) => UiErrorCategory::Server,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_form(context: UiErrorContext, err: &FormError) -> Self {
        match err {
            FormError::Store(err) => Self::from_store(context, err),
            FormError::ClientValidation(err) => Self {
                category: UiErrorCategory::Validation,
                context,
                message: err.to_string(),
            },
            FormError::NotOpen | FormError::AlreadyOpen => Self {
                category: UiErrorCategory::Form,
                context,
                message: err.to_string(),
            },
        }
    }

    /// Whether repeating the same action may succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            UiErrorCategory::Transport | UiErrorCategory::Timeout | UiErrorCategory::Server
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
