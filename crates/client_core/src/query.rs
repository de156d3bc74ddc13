//! Pure filters over a contact snapshot.

use shared::domain::{Contact, Tags};

/// Contacts whose name starts with `query`, ignoring case. An empty query
/// matches everything.
pub fn filter_by_name_prefix(contacts: &[Contact], query: &str) -> Vec<Contact> {
    let query = query.to_lowercase();
    contacts
        .iter()
        .filter(|contact| contact.full_name.to_lowercase().starts_with(&query))
        .cloned()
        .collect()
}

pub fn filter_by_tag(contacts: &[Contact], tag: &str) -> Vec<Contact> {
    contacts
        .iter()
        .filter(|contact| contact.tags.contains(tag))
        .cloned()
        .collect()
}

/// Every tag in use, in the order it is first seen across `contacts`.
pub fn collect_all_tags(contacts: &[Contact]) -> Tags {
    contacts
        .iter()
        .flat_map(|contact| contact.tags.iter())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOption {
    pub tag: String,
    pub selected: bool,
}

/// Tag picker options: the vocabulary with `selected` marked, followed by any
/// selected tag the vocabulary does not know yet.
pub fn tag_options(vocabulary: &Tags, selected: &Tags) -> Vec<TagOption> {
    let mut options: Vec<TagOption> = vocabulary
        .iter()
        .map(|tag| TagOption {
            tag: tag.to_string(),
            selected: selected.contains(tag),
        })
        .collect();
    options.extend(
        selected
            .iter()
            .filter(|tag| !vocabulary.contains(tag))
            .map(|tag| TagOption {
                tag: tag.to_string(),
                selected: true,
            }),
    );
    options
}

#[cfg(test)]
mod tests {
    use shared::domain::ContactId;

    use super::*;

    fn contact(id: i64, name: &str, tags: &str) -> Contact {
        Contact {
            id: ContactId::Numeric(id),
            full_name: name.to_string(),
            email: format!("c{id}@example.com"),
            phone_number: "555-123-4567".to_string(),
            tags: Tags::parse(tags),
        }
    }

    fn sample() -> Vec<Contact> {
        vec![
            contact(1, "Alice Smith", "work,friend"),
            contact(2, "albert Jones", ""),
            contact(3, "Bob Brown", "friend"),
            contact(4, "Carol White", "family,work"),
        ]
    }

    fn ids(contacts: &[Contact]) -> Vec<ContactId> {
        contacts.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn name_prefix_is_case_insensitive() {
        let matches = filter_by_name_prefix(&sample(), "AL");
        assert_eq!(ids(&matches), vec![ContactId::Numeric(1), ContactId::Numeric(2)]);
    }

    #[test]
    fn name_prefix_does_not_match_inner_words() {
        assert!(filter_by_name_prefix(&sample(), "smith").is_empty());
    }

    #[test]
    fn empty_query_returns_input_unchanged() {
        assert_eq!(filter_by_name_prefix(&sample(), ""), sample());
    }

    #[test]
    fn tag_filter_uses_membership_and_skips_untagged() {
        let contacts = sample();
        let friends = filter_by_tag(&contacts, "friend");
        assert_eq!(ids(&friends), vec![ContactId::Numeric(1), ContactId::Numeric(3)]);
        assert!(filter_by_tag(&contacts, "").is_empty());
        assert!(filter_by_tag(&contacts, "fri").is_empty());
    }

    #[test]
    fn collects_tags_in_first_seen_order() {
        let tags = collect_all_tags(&sample());
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec!["work", "friend", "family"]
        );
    }

    #[test]
    fn collecting_tags_is_idempotent() {
        let once = collect_all_tags(&sample());
        let as_contacts = vec![contact(9, "Tags", &once.joined())];
        let twice = collect_all_tags(&as_contacts);
        assert_eq!(
            once.iter().collect::<Vec<_>>(),
            twice.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn tag_options_preselect_contact_tags() {
        let vocabulary = Tags::parse("work,friend,family");
        let options = tag_options(&vocabulary, &Tags::parse("family,new"));
        assert_eq!(
            options,
            vec![
                TagOption { tag: "work".into(), selected: false },
                TagOption { tag: "friend".into(), selected: false },
                TagOption { tag: "family".into(), selected: true },
                TagOption { tag: "new".into(), selected: true },
            ]
        );
    }
}
