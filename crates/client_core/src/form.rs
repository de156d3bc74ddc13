//! Add/edit contact form workflow.

use std::{collections::BTreeMap, sync::Arc};

use shared::domain::{Contact, ContactDraft, ContactId, Tags};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    phone::{KeyOutcome, PhoneInput, PhoneKey},
    query::{collect_all_tags, tag_options, TagOption},
    store::ContactStore,
    validation::{validate_draft, validate_field, ClientValidationError, Field, FieldError},
    view_sync::ViewSync,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Closed,
    AddOpen,
    EditOpen(ContactId),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("contact form is not open")]
    NotOpen,
    #[error("contact form is already open")]
    AlreadyOpen,
    #[error(transparent)]
    ClientValidation(#[from] ClientValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Created,
    Updated,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub kind: SubmitKind,
    pub contact: Contact,
    /// Set when the save went through but the views could not be refreshed
    /// afterwards.
    pub refresh_error: Option<StoreError>,
}

pub struct FormOrchestrator {
    store: Arc<dyn ContactStore>,
    state: FormState,
    full_name: String,
    email: String,
    phone: PhoneInput,
    vocabulary: Tags,
    selected_tags: Tags,
    invalid: BTreeMap<Field, &'static str>,
    focus: Option<Field>,
    last_error: Option<StoreError>,
}

impl FormOrchestrator {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            store,
            state: FormState::Closed,
            full_name: String::new(),
            email: String::new(),
            phone: PhoneInput::default(),
            vocabulary: Tags::default(),
            selected_tags: Tags::default(),
            invalid: BTreeMap::new(),
            focus: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> String {
        self.phone.value()
    }

    pub fn selected_tags(&self) -> &Tags {
        &self.selected_tags
    }

    pub fn tag_options(&self) -> Vec<TagOption> {
        tag_options(&self.vocabulary, &self.selected_tags)
    }

    pub fn focused(&self) -> Option<Field> {
        self.focus
    }

    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        self.invalid.get(&field).copied()
    }

    pub fn invalid_fields(&self) -> Vec<Field> {
        self.invalid.keys().copied().collect()
    }

    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub async fn open_add(&mut self) -> Result<(), FormError> {
        self.ensure_closed()?;
        let vocabulary = collect_all_tags(&self.store.list_all().await?);

        self.reset();
        self.vocabulary = vocabulary;
        self.state = FormState::AddOpen;
        self.focus = Some(Field::FullName);
        debug!(tags = self.vocabulary.len(), "form: opened for new contact");
        Ok(())
    }

    pub async fn open_edit(&mut self, id: &ContactId) -> Result<(), FormError> {
        self.ensure_closed()?;
        let contact = self.store.get(id).await?;
        let vocabulary = collect_all_tags(&self.store.list_all().await?);

        self.reset();
        self.vocabulary = vocabulary;
        self.full_name = contact.full_name;
        self.email = contact.email;
        self.phone.set(&contact.phone_number);
        self.selected_tags = contact.tags;
        self.state = FormState::EditOpen(id.clone());
        self.focus = Some(Field::FullName);
        debug!(contact_id = %id, "form: opened for edit");
        Ok(())
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.full_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
    }

    pub fn phone_key(&mut self, key: PhoneKey) -> KeyOutcome {
        self.phone.handle_key(key)
    }

    pub fn set_phone(&mut self, raw: &str) {
        self.phone.set(raw);
    }

    /// Selects `tag`, creating it when it is not part of the vocabulary.
    pub fn select_tag(&mut self, tag: &str) -> bool {
        self.selected_tags.insert(tag)
    }

    pub fn deselect_tag(&mut self, tag: &str) -> bool {
        self.selected_tags.remove(tag)
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags = Tags::default();
    }

    /// Re-checks one field after it loses focus, marking or clearing its
    /// inline error.
    pub fn blur(&mut self, field: Field) -> Option<FieldError> {
        let value = match field {
            Field::FullName => self.full_name.clone(),
            Field::Email => self.email.clone(),
            Field::PhoneNumber => self.phone.value(),
        };
        let error = validate_field(field, &value);
        match &error {
            Some(error) => {
                self.invalid.insert(field, error.message);
            }
            None => {
                self.invalid.remove(&field);
            }
        }
        error
    }

    pub fn draft(&self) -> ContactDraft {
        ContactDraft {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone.value(),
            tags: self.selected_tags.clone(),
        }
    }

    /// Validates, saves, and on success closes the form and reconciles
    /// `views`. A server-side failure leaves the form open.
    pub async fn submit(&mut self, views: &mut ViewSync) -> Result<SubmitOutcome, FormError> {
        let editing = match &self.state {
            FormState::Closed => return Err(FormError::NotOpen),
            FormState::AddOpen => None,
            FormState::EditOpen(id) => Some(id.clone()),
        };

        let draft = self.draft();
        if let Err(err) = validate_draft(&draft) {
            self.invalid = err
                .errors
                .iter()
                .map(|error| (error.field, error.message))
                .collect();
            debug!(%err, "form: submit blocked by client validation");
            return Err(err.into());
        }
        self.invalid.clear();

        let saved = match &editing {
            None => self.store.create(&draft).await,
            Some(id) => self.store.update(id, &draft).await,
        };
        let contact = match saved {
            Ok(contact) => contact,
            Err(err) => {
                warn!(error = %err, "form: save rejected, keeping form open");
                self.last_error = Some(err.clone());
                return Err(err.into());
            }
        };

        self.close();
        let (kind, refresh_error) = match editing {
            None => {
                views.apply_created(contact.clone());
                (SubmitKind::Created, None)
            }
            Some(_) => (
                SubmitKind::Updated,
                views.apply_updated(contact.clone()).await.err(),
            ),
        };
        info!(contact_id = %contact.id, ?kind, "form: contact saved");
        Ok(SubmitOutcome {
            kind,
            contact,
            refresh_error,
        })
    }

    /// Discards all input and closes the form.
    pub fn cancel(&mut self) {
        self.close();
        debug!("form: cancelled");
    }

    fn close(&mut self) {
        self.reset();
        self.state = FormState::Closed;
    }

    fn reset(&mut self) {
        self.full_name.clear();
        self.email.clear();
        self.phone.clear();
        self.vocabulary = Tags::default();
        self.selected_tags = Tags::default();
        self.invalid.clear();
        self.focus = None;
        self.last_error = None;
    }

    fn ensure_closed(&self) -> Result<(), FormError> {
        if self.is_open() {
            return Err(FormError::AlreadyOpen);
        }
        Ok(())
    }
}
