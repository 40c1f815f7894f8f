use std::{
  fmt::{Debug, Formatter},
  hash::{Hash, Hasher},
  sync::Weak,
};

/// A type-erased view of an observable: something a token can ask to drop
/// a subscription, without knowing the element type.
pub trait Unsubscribable: Send + Sync {
  /// Remove the subscriber registered under `id`, if still present.
  fn unsubscribe_id(&self, id: usize);
}

/// Opaque handle returned by `subscribe`, used solely to request
/// unsubscription.
///
/// The token holds a non-owning back-reference to the cell that issued it:
/// it never keeps the cell alive, and unsubscribing after the cell is gone
/// is a no-op. This breaks the cycle that would otherwise arise from a cell
/// owning callbacks that close over tokens referencing the cell.
///
/// Ids are unique within the issuing cell's lifetime and never reused;
/// equality and hashing are by id.
#[derive(Clone)]
pub struct SubscriptionToken {
  id: usize,
  owner: Weak<dyn Unsubscribable>,
}

impl SubscriptionToken {
  pub(crate) fn new(id: usize, owner: Weak<dyn Unsubscribable>) -> Self {
    SubscriptionToken { id, owner }
  }

  pub fn id(&self) -> usize { self.id }

  /// Stop the associated subscription. Idempotent; a no-op once the
  /// issuing cell has been dropped.
  pub fn unsubscribe(&self) {
    if let Some(owner) = self.owner.upgrade() {
      owner.unsubscribe_id(self.id);
    }
  }
}

impl PartialEq for SubscriptionToken {
  fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for SubscriptionToken {}

impl Hash for SubscriptionToken {
  fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl Debug for SubscriptionToken {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionToken")
      .field("id", &self.id)
      .field("owner_alive", &(self.owner.strong_count() > 0))
      .finish()
  }
}
