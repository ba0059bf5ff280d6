//! Minting of fresh list item identities.

use uuid::Uuid;

use crate::model::ItemId;
use crate::sequence::BlockSequence;

/// Source of fresh item ids. Implementations must never hand out the same id
/// twice.
pub trait IdGenerator {
    fn next_id(&mut self) -> ItemId;
}

/// Random v4 UUIDs in their simple (hyphen-less) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> ItemId {
        ItemId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Predictable ids of the form `a00`, `a01`, ... Used by tests and by hosts
/// that prefer readable ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("a")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ItemId {
        let id = ItemId::new(format!("{}{:02}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> ItemId {
        (**self).next_id()
    }
}

/// Mint an id that is not carried by any block of `seq`
pub fn mint_unused<S: BlockSequence + ?Sized>(seq: &S, ids: &mut dyn IdGenerator) -> ItemId {
    loop {
        let id = ids.next_id();
        if !seq.contains_item_id(&id) {
            return id;
        }
        log::trace!("id generator produced {id}, already in use; retrying");
    }
}
