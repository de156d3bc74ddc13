//! Controller layer: wires the store, views and form together and turns
//! outcomes into user notifications.

pub mod events;

use std::{sync::Arc, time::Duration};

use shared::domain::{Contact, ContactId};
use tokio::sync::broadcast;
use tracing::info;

use crate::{
    form::{FormError, FormOrchestrator, SubmitKind},
    store::ContactStore,
    view_sync::ViewSync,
};

use events::{ControllerEvent, UiError, UiErrorContext};

pub struct ContactsController {
    views: ViewSync,
    form: FormOrchestrator,
    events: broadcast::Sender<ControllerEvent>,
}

impl ContactsController {
    pub fn new(store: Arc<dyn ContactStore>, snapshot_ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            views: ViewSync::new(Arc::clone(&store), snapshot_ttl),
            form: FormOrchestrator::new(store),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn views(&self) -> &ViewSync {
        &self.views
    }

    pub fn form(&self) -> &FormOrchestrator {
        &self.form
    }

    /// Field edits go straight to the form; only lifecycle actions run
    /// through the controller.
    pub fn form_mut(&mut self) -> &mut FormOrchestrator {
        &mut self.form
    }

    pub async fn start(&mut self) -> Result<(), UiError> {
        let result = self.views.load().await;
        self.finish_view_action(UiErrorContext::Startup, result)
    }

    pub async fn open_add_form(&mut self) -> Result<(), UiError> {
        let result = self.form.open_add().await;
        self.finish_form_action(UiErrorContext::OpenForm, result)
    }

    pub async fn open_edit_form(&mut self, id: &ContactId) -> Result<(), UiError> {
        let result = self.form.open_edit(id).await;
        self.finish_form_action(UiErrorContext::OpenForm, result)
    }

    pub async fn submit_form(&mut self) -> Result<Contact, UiError> {
        let outcome = match self.form.submit(&mut self.views).await {
            Ok(outcome) => outcome,
            // Fields are marked inline; nothing to announce.
            Err(err @ FormError::ClientValidation(_)) => {
                return Err(UiError::from_form(UiErrorContext::Submit, &err));
            }
            Err(err) => return Err(self.report(UiError::from_form(UiErrorContext::Submit, &err))),
        };

        self.emit(ControllerEvent::ViewChanged(self.views.state()));
        if let Some(err) = &outcome.refresh_error {
            self.report(UiError::from_store(UiErrorContext::TagFilter, err));
        }
        let name = &outcome.contact.full_name;
        let notice = match outcome.kind {
            SubmitKind::Created => format!("Contact {name} has been added."),
            SubmitKind::Updated => format!("Contact {name} has been updated."),
        };
        self.emit(ControllerEvent::Notice(notice));
        Ok(outcome.contact)
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Deletes a contact the user already confirmed.
    pub async fn delete_contact(&mut self, id: &ContactId) -> Result<(), UiError> {
        let name = self
            .views
            .snapshot()
            .iter()
            .find(|contact| &contact.id == id)
            .map(|contact| contact.full_name.clone())
            .unwrap_or_else(|| format!("Contact {id}"));

        let result = self.views.delete(id).await;
        self.finish_view_action(UiErrorContext::Delete, result)?;
        info!(contact_id = %id, "controller: contact deleted");
        self.emit(ControllerEvent::Notice(format!("{name} has been deleted.")));
        Ok(())
    }

    pub async fn filter_by_tag(&mut self, tag: &str) -> Result<(), UiError> {
        let result = self.views.open_tag_filter(tag).await;
        self.finish_view_action(UiErrorContext::TagFilter, result)
    }

    pub async fn close_tag_filter(&mut self) -> Result<(), UiError> {
        let result = self.views.close_tag_filter().await;
        self.finish_view_action(UiErrorContext::TagFilter, result)
    }

    pub fn open_search(&mut self) {
        self.views.open_search();
        self.emit(ControllerEvent::ViewChanged(self.views.state()));
    }

    pub async fn search_input(&mut self, query: &str) -> Result<(), UiError> {
        let result = self.views.search(query).await;
        self.finish_view_action(UiErrorContext::Search, result)
    }

    pub fn cancel_search(&mut self) {
        self.views.cancel_search();
        self.emit(ControllerEvent::ViewChanged(self.views.state()));
    }

    pub async fn select_search_result(&mut self, id: &ContactId) -> Result<Contact, UiError> {
        self.views
            .select_search_result(id)
            .await
            .map_err(|err| self.report(UiError::from_store(UiErrorContext::Search, &err)))
    }

    fn finish_view_action(
        &self,
        context: UiErrorContext,
        result: Result<(), crate::error::StoreError>,
    ) -> Result<(), UiError> {
        result.map_err(|err| self.report(UiError::from_store(context, &err)))?;
        self.emit(ControllerEvent::ViewChanged(self.views.state()));
        Ok(())
    }

    fn finish_form_action(
        &self,
        context: UiErrorContext,
        result: Result<(), FormError>,
    ) -> Result<(), UiError> {
        result.map_err(|err| self.report(UiError::from_form(context, &err)))
    }

    fn report(&self, err: UiError) -> UiError {
        self.emit(ControllerEvent::Error(err.clone()));
        err
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}
