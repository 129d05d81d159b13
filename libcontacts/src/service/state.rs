//! View state, events and the form reducer
//!
//! `reduce` is a pure function `(FormState, &ContactEvent) -> (FormState,
//! Option<Effect>)`. It never touches the store; store work is described by
//! the returned `Effect` and carried out by the controller.

use crate::types::{Contact, SortOrder};

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub contacts: Vec<Contact>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_adding_contact: bool,
    pub sort_order: SortOrder,
}

impl ViewState {
    /// Merge the transient form fields with a query result
    pub fn merge(form: &FormState, sort_order: SortOrder, contacts: Vec<Contact>) -> Self {
        Self {
            contacts,
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            phone_number: form.phone_number.clone(),
            is_adding_contact: form.is_adding_contact,
            sort_order,
        }
    }

    /// The transient part of this view state
    pub fn form(&self) -> FormState {
        FormState {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            is_adding_contact: self.is_adding_contact,
        }
    }
}

/// Transient UI fields owned by the reducer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_adding_contact: bool,
}

impl FormState {
    /// Whether every draft field has non-blank content
    pub fn is_complete(&self) -> bool {
        !is_blank(&self.first_name) && !is_blank(&self.last_name) && !is_blank(&self.phone_number)
    }
}

/// User intents accepted by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEvent {
    ShowDialog,
    HideDialog,
    SetFirstName(String),
    SetLastName(String),
    SetPhoneNumber(String),
    SaveContact,
    DeleteContact(Contact),
    SortContacts(SortOrder),
}

/// Store work requested by an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Upsert(Contact),
    Delete(Contact),
    Sort(SortOrder),
}

/// Empty or whitespace-only
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Apply one event to the form state
pub fn reduce(state: FormState, event: &ContactEvent) -> (FormState, Option<Effect>) {
    match event {
        ContactEvent::ShowDialog => (
            FormState {
                is_adding_contact: true,
                ..state
            },
            None,
        ),

        ContactEvent::HideDialog => (
            FormState {
                is_adding_contact: false,
                ..state
            },
            None,
        ),

        ContactEvent::SetFirstName(first_name) => (
            FormState {
                first_name: first_name.clone(),
                ..state
            },
            None,
        ),

        ContactEvent::SetLastName(last_name) => (
            FormState {
                last_name: last_name.clone(),
                ..state
            },
            None,
        ),

        ContactEvent::SetPhoneNumber(phone_number) => (
            FormState {
                phone_number: phone_number.clone(),
                ..state
            },
            None,
        ),

        ContactEvent::SaveContact => {
            if !state.is_complete() {
                return (state, None);
            }

            // Stored as typed; the store assigns the id
            let contact = Contact::new(state.first_name, state.last_name, state.phone_number);
            (FormState::default(), Some(Effect::Upsert(contact)))
        }

        ContactEvent::DeleteContact(contact) => (state, Some(Effect::Delete(contact.clone()))),

        ContactEvent::SortContacts(order) => (state, Some(Effect::Sort(*order))),
    }
}
