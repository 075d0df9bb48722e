//! Shared types for embedded, id-addressed sub-documents

use uuid::Uuid;

use crate::database::models::{Account, Address, AddressInput, Phone, PhoneInput};

/// Mutation applied to one entry of a repeatable sub-document collection
#[derive(Debug, Clone)]
pub enum SubdocumentOp<I> {
    Append(I),
    Replace(Uuid, I),
    Remove(Uuid),
}

/// Repeatable embedded record with a stable id, reachable only through its owning account
pub trait Subdocument: Clone + Send + Sized {
    type Input: Send;

    /// Human-readable name used in "not found" messages.
    const LABEL: &'static str;

    fn id(&self) -> Uuid;

    fn build(input: Self::Input, id: Uuid) -> Self;

    fn collection(account: &mut Account) -> &mut Vec<Self>;
}

impl Subdocument for Address {
    type Input = AddressInput;
    const LABEL: &'static str = "Address";

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(input: AddressInput, id: Uuid) -> Self {
        input.into_address(id)
    }

    fn collection(account: &mut Account) -> &mut Vec<Self> {
        &mut account.addresses
    }
}

impl Subdocument for Phone {
    type Input = PhoneInput;
    const LABEL: &'static str = "Phone number";

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(input: PhoneInput, id: Uuid) -> Self {
        input.into_phone(id)
    }

    fn collection(account: &mut Account) -> &mut Vec<Self> {
        &mut account.phone_numbers
    }
}

/// Apply `op` to `entries`. Returns false when the targeted id is not present.
pub fn apply_subdocument_op<S: Subdocument>(entries: &mut Vec<S>, op: SubdocumentOp<S::Input>) -> bool {
    match op {
        SubdocumentOp::Append(input) => {
            entries.push(S::build(input, Uuid::new_v4()));
            true
        }
        SubdocumentOp::Replace(id, input) => match entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                *entry = S::build(input, id);
                true
            }
            None => false,
        },
        SubdocumentOp::Remove(id) => {
            let before = entries.len();
            entries.retain(|e| e.id() != id);
            entries.len() != before
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ContactKind;

    #[test]
    fn append_assigns_fresh_ids() {
        let mut phones: Vec<Phone> = vec![];
        apply_subdocument_op(&mut phones, SubdocumentOp::Append(PhoneInput { number: Some("1".into()), ..Default::default() }));
        apply_subdocument_op(&mut phones, SubdocumentOp::Append(PhoneInput { number: Some("2".into()), ..Default::default() }));
        assert_eq!(phones.len(), 2);
        assert_ne!(phones[0].id, phones[1].id);
    }

    #[test]
    fn replace_keeps_id_and_resets_defaults() {
        let mut addresses: Vec<Address> = vec![];
        apply_subdocument_op(
            &mut addresses,
            SubdocumentOp::Append(AddressInput {
                kind: Some(ContactKind::Secondary),
                country: Some("Canada".into()),
                ..Default::default()
            }),
        );
        let id = addresses[0].id;

        let replaced = apply_subdocument_op(
            &mut addresses,
            SubdocumentOp::Replace(id, AddressInput { city: Some("Miami".into()), ..Default::default() }),
        );
        assert!(replaced);
        assert_eq!(addresses[0].id, id);
        assert_eq!(addresses[0].city.as_deref(), Some("Miami"));
        assert_eq!(addresses[0].kind, ContactKind::Primary);
        assert_eq!(addresses[0].country, "United States");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut phones: Vec<Phone> = vec![];
        assert!(!apply_subdocument_op(&mut phones, SubdocumentOp::Remove(Uuid::new_v4())));
        assert!(!apply_subdocument_op(&mut phones, SubdocumentOp::Replace(Uuid::new_v4(), PhoneInput::default())));
    }
}
