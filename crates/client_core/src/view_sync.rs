//! Keeps the list, tag-filter and search surfaces consistent with the
//! contact snapshot across mutations.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use shared::domain::{Contact, ContactId};
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    query::{filter_by_name_prefix, filter_by_tag},
    store::ContactStore,
};

/// What the main container shows when no search overlays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseView {
    ListAll,
    TagFiltered(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    ListAll,
    TagFiltered(String),
    SearchActive { query: String, underlying: BaseView },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainSurface {
    Cards(Vec<Contact>),
    /// "There are no contacts." placeholder.
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchResults {
    #[default]
    Idle,
    Matches(Vec<Contact>),
    NoMatches,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSurface {
    pub query: String,
    pub results: SearchResults,
    pub selected: Option<Contact>,
}

pub struct ViewSync {
    store: Arc<dyn ContactStore>,
    snapshot: Vec<Contact>,
    fetched_at: Option<Instant>,
    snapshot_ttl: Duration,
    base: BaseView,
    search: Option<SearchSurface>,
}

impl ViewSync {
    /// `snapshot_ttl` bounds how long search keystrokes may reuse the last
    /// fetched list before asking the server again.
    pub fn new(store: Arc<dyn ContactStore>, snapshot_ttl: Duration) -> Self {
        Self {
            store,
            snapshot: Vec::new(),
            fetched_at: None,
            snapshot_ttl,
            base: BaseView::ListAll,
            search: None,
        }
    }

    pub fn state(&self) -> ViewState {
        match (&self.search, &self.base) {
            (Some(search), base) => ViewState::SearchActive {
                query: search.query.clone(),
                underlying: base.clone(),
            },
            (None, BaseView::ListAll) => ViewState::ListAll,
            (None, BaseView::TagFiltered(tag)) => ViewState::TagFiltered(tag.clone()),
        }
    }

    pub fn base_view(&self) -> &BaseView {
        &self.base
    }

    pub fn snapshot(&self) -> &[Contact] {
        &self.snapshot
    }

    pub fn main_surface(&self) -> MainSurface {
        let cards = match &self.base {
            BaseView::ListAll => self.snapshot.clone(),
            BaseView::TagFiltered(tag) => filter_by_tag(&self.snapshot, tag),
        };
        if cards.is_empty() {
            MainSurface::Empty
        } else {
            MainSurface::Cards(cards)
        }
    }

    pub fn search_surface(&self) -> Option<&SearchSurface> {
        self.search.as_ref()
    }

    /// Startup fetch. Leaves the views in `ListAll`.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.refresh_snapshot().await?;
        self.base = BaseView::ListAll;
        self.search = None;
        info!(count = self.snapshot.len(), "views: initial contact list loaded");
        Ok(())
    }

    pub async fn open_tag_filter(&mut self, tag: &str) -> Result<(), StoreError> {
        self.refresh_snapshot().await?;
        self.base = BaseView::TagFiltered(tag.to_string());
        self.search = None;
        info!(%tag, "views: tag filter opened");
        Ok(())
    }

    pub async fn close_tag_filter(&mut self) -> Result<(), StoreError> {
        self.refresh_snapshot().await?;
        self.base = BaseView::ListAll;
        info!("views: tag filter closed");
        Ok(())
    }

    pub fn open_search(&mut self) {
        if self.search.is_none() {
            self.search = Some(SearchSurface::default());
            debug!("views: search opened");
        }
    }

    pub fn cancel_search(&mut self) {
        if self.search.take().is_some() {
            debug!("views: search closed");
        }
    }

    /// Runs one search keystroke. An empty query resets the results without
    /// touching the network.
    pub async fn search(&mut self, query: &str) -> Result<(), StoreError> {
        self.open_search();
        if query.is_empty() {
            self.search = Some(SearchSurface::default());
            return Ok(());
        }

        if !self.snapshot_is_fresh() {
            self.refresh_snapshot().await?;
        }
        let matches = filter_by_name_prefix(&self.snapshot, query);
        debug!(%query, matches = matches.len(), "views: search updated");
        self.search = Some(SearchSurface {
            query: query.to_string(),
            results: if matches.is_empty() {
                SearchResults::NoMatches
            } else {
                SearchResults::Matches(matches)
            },
            selected: None,
        });
        Ok(())
    }

    pub async fn select_search_result(&mut self, id: &ContactId) -> Result<Contact, StoreError> {
        let contact = self.store.get(id).await?;
        if let Some(search) = self.search.as_mut() {
            search.selected = Some(contact.clone());
        }
        Ok(contact)
    }

    /// New contacts join the snapshot. An active tag filter shows them only
    /// when they carry its tag.
    pub fn apply_created(&mut self, contact: Contact) {
        info!(contact_id = %contact.id, "views: contact added");
        self.snapshot.push(contact);
    }

    pub async fn apply_updated(&mut self, contact: Contact) -> Result<(), StoreError> {
        let contact_id = contact.id.clone();
        match self.snapshot.iter_mut().find(|c| c.id == contact_id) {
            Some(card) => *card = contact,
            None => {
                warn!(contact_id = %contact_id, "views: updated contact missing from snapshot");
                self.snapshot.push(contact);
            }
        }
        self.cancel_search();

        if let BaseView::TagFiltered(tag) = self.base.clone() {
            debug!(%tag, "views: refreshing tag filter after update");
            self.refresh_snapshot().await?;
        }
        info!(contact_id = %contact_id, "views: contact updated");
        Ok(())
    }

    pub fn apply_deleted(&mut self, id: &ContactId) {
        self.snapshot.retain(|contact| &contact.id != id);
        self.cancel_search();
        info!(contact_id = %id, remaining = self.snapshot.len(), "views: contact removed");
    }

    pub async fn delete(&mut self, id: &ContactId) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        self.apply_deleted(id);
        Ok(())
    }

    async fn refresh_snapshot(&mut self) -> Result<(), StoreError> {
        self.snapshot = self.store.list_all().await?;
        self.fetched_at = Some(Instant::now());
        Ok(())
    }

    fn snapshot_is_fresh(&self) -> bool {
        self.fetched_at
            .is_some_and(|fetched_at| fetched_at.elapsed() < self.snapshot_ttl)
    }
}
