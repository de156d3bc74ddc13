//! Plain-text rendering of the controller's surfaces.

use client_core::{
    format_phone, BaseView, Field, FormOrchestrator, MainSurface, SearchResults, SearchSurface,
};
use shared::domain::{Contact, Tags};

pub const NO_CONTACTS: &str = "There are no contacts.";
pub const NO_RESULTS: &str = "No contact found";

pub fn card(contact: &Contact) -> String {
    let mut out = format!(
        "#{} {}\n  email: {}\n  phone: {}",
        contact.id,
        contact.full_name,
        contact.email,
        format_phone(&contact.phone_number)
    );
    if !contact.tags.is_empty() {
        out.push_str(&format!(
            "\n  tags:  {}",
            contact.tags.iter().collect::<Vec<_>>().join(", ")
        ));
    }
    out
}

pub fn main_surface(base: &BaseView, surface: &MainSurface) -> String {
    let mut blocks = Vec::new();
    if let BaseView::TagFiltered(tag) = base {
        blocks.push(format!("tag: {tag}"));
    }
    match surface {
        MainSurface::Cards(contacts) => blocks.extend(contacts.iter().map(card)),
        MainSurface::Empty => blocks.push(NO_CONTACTS.to_string()),
    }
    blocks.join("\n")
}

pub fn search_surface(surface: &SearchSurface) -> String {
    let mut lines = match &surface.results {
        SearchResults::Idle => Vec::new(),
        SearchResults::Matches(matches) => matches
            .iter()
            .map(|contact| format!("#{} {}", contact.id, contact.full_name))
            .collect(),
        SearchResults::NoMatches => vec![NO_RESULTS.to_string()],
    };
    if let Some(selected) = &surface.selected {
        lines.push(card(selected));
    }
    lines.join("\n")
}

pub fn tags(tags: &Tags) -> String {
    tags.iter().collect::<Vec<_>>().join("\n")
}

/// Inline messages for every field the form marked invalid.
pub fn field_errors(form: &FormOrchestrator) -> String {
    Field::ALL
        .iter()
        .filter_map(|field| {
            form.field_error(*field)
                .map(|message| format!("{field}: {message}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
