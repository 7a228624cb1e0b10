//! Change notification of geometries.
//!
//! Every geometry keeps a revision counter that is increased by each logical mutation, and a list of observers that
//! are called with a [`GeometryChanged`] value describing the mutation. Aggregate geometries (polygons and collections)
//! give out mutable access to their children through [`ChildMut`] guards: when a guard is dropped and the child's
//! revision has changed, the owner raises one event of its own.

use std::fmt::{Debug, Formatter};
use std::ops::{Deref, DerefMut};

use crate::geometry::Geometry;

/// Description of a change of a geometry's defining coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryChanged {
    /// Coordinates of a point or curve were changed.
    Coordinates,
    /// Shell of a polygon was modified.
    Shell,
    /// A hole was added at the index.
    HoleAdded(usize),
    /// A hole was removed from the index.
    HoleRemoved(usize),
    /// The hole at the index was modified.
    HoleModified(usize),
    /// All holes were removed. Contains the number of removed holes.
    HolesCleared(usize),
    /// An item was added to a collection at the index.
    ItemAdded(usize),
    /// An item was removed from a collection at the index.
    ItemRemoved(usize),
    /// The collection item at the index was modified.
    ItemModified(usize),
    /// All items were removed from a collection. Contains the number of removed items.
    ItemsCleared(usize),
}

/// Identifier of an observer subscription, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Observer callback.
pub type Observer = Box<dyn FnMut(&GeometryChanged) + Send + Sync>;

/// Revision counter and observer list of a geometry.
///
/// Cloning a notifier gives a fresh one: observers belong to the instance they were subscribed to.
#[derive(Default)]
pub(crate) struct ChangeNotifier {
    revision: u64,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ChangeNotifier {
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != len
    }

    pub(crate) fn notify(&mut self, change: GeometryChanged) {
        self.revision += 1;
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl Debug for ChangeNotifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Mutable access to a child geometry of a polygon or collection.
///
/// If the child was modified while the guard was alive, the owner raises the guard's change event once when the guard
/// is dropped.
pub struct ChildMut<'a, G: Geometry> {
    child: &'a mut G,
    owner: &'a mut ChangeNotifier,
    revision: u64,
    change: GeometryChanged,
    on_release: Option<Box<dyn FnOnce(&mut G) + 'a>>,
}

impl<'a, G: Geometry> ChildMut<'a, G> {
    pub(crate) fn new(
        child: &'a mut G,
        owner: &'a mut ChangeNotifier,
        change: GeometryChanged,
    ) -> Self {
        let revision = child.revision();
        Self {
            child,
            owner,
            revision,
            change,
            on_release: None,
        }
    }

    /// Runs `on_release` on the child when the guard is dropped, before the owner is notified.
    pub(crate) fn with_on_release(mut self, on_release: impl FnOnce(&mut G) + 'a) -> Self {
        self.on_release = Some(Box::new(on_release));
        self
    }
}

impl<G: Geometry> Deref for ChildMut<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.child
    }
}

impl<G: Geometry> DerefMut for ChildMut<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.child
    }
}

impl<G: Geometry> AsRef<G> for ChildMut<'_, G> {
    fn as_ref(&self) -> &G {
        self.child
    }
}

impl<G: Geometry> AsMut<G> for ChildMut<'_, G> {
    fn as_mut(&mut self) -> &mut G {
        self.child
    }
}

impl<G: Geometry> Drop for ChildMut<'_, G> {
    fn drop(&mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release(&mut *self.child);
        }

        if self.child.revision() != self.revision {
            self.owner.notify(self.change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(notifier: &mut ChangeNotifier) -> Arc<Mutex<Vec<GeometryChanged>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        notifier.subscribe(Box::new(move |change| sink.lock().unwrap().push(*change)));
        events
    }

    #[test]
    fn notify_increases_revision() {
        let mut notifier = ChangeNotifier::default();
        let events = recorder(&mut notifier);

        notifier.notify(GeometryChanged::Coordinates);
        notifier.notify(GeometryChanged::HoleAdded(0));

        assert_eq!(notifier.revision(), 2);
        assert_eq!(
            *events.lock().unwrap(),
            vec![GeometryChanged::Coordinates, GeometryChanged::HoleAdded(0)]
        );
    }

    #[test]
    fn unsubscribe() {
        let mut notifier = ChangeNotifier::default();
        let id = notifier.subscribe(Box::new(|_| panic!("must not be called")));

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(GeometryChanged::Shell);
    }

    #[test]
    fn clone_drops_observers() {
        let mut notifier = ChangeNotifier::default();
        let events = recorder(&mut notifier);
        notifier.notify(GeometryChanged::Coordinates);

        let mut clone = notifier.clone();
        clone.notify(GeometryChanged::Coordinates);

        assert_eq!(clone.revision(), 1);
        assert_eq!(events.lock().unwrap().len(), 1);
    }
}
