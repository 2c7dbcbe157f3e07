//! Non-owning consumer handles and the invalidation protocol.
//!
//! External objects that hold derived views over a graph (precomputed
//! random-walk state and the like) register themselves and are notified
//! synchronously when the graph changes or goes away. The graph depends
//! only on this capability interface, never on a concrete consumer type.

use std::fmt;
use std::rc::{Rc, Weak};

/// Capability interface for objects holding derived views over a graph.
///
/// `invalidate` means "the graph this view was built against has changed;
/// derived state is stale". `kill` means "the graph no longer exists" and
/// is delivered exactly once, from the graph's destruction; after it, the
/// consumer must not reach back into the graph. Both are plain state flips
/// on the consumer side, so implementors carry interior mutability.
pub trait GraphConsumer {
    fn invalidate(&self);
    fn kill(&self);
}

/// Growable collection of weak back-references to registered consumers.
///
/// Handles are appended by `associate` and never removed by notification;
/// invalidation is a broadcast, not a deregistration. Consumers own their
/// own lifetime, so a handle whose consumer is gone is simply skipped.
#[derive(Default)]
pub(crate) struct ConsumerRegistry {
    handles: Vec<Weak<dyn GraphConsumer>>,
}

impl ConsumerRegistry {
    pub(crate) fn associate<C>(&mut self, consumer: &Rc<C>)
    where
        C: GraphConsumer + 'static,
    {
        let handle = Rc::downgrade(consumer);
        self.handles.push(handle);
    }

    pub(crate) fn invalidate_all(&self) {
        for handle in &self.handles {
            if let Some(consumer) = handle.upgrade() {
                consumer.invalidate();
            }
        }
    }

    pub(crate) fn kill_all(&self) {
        for handle in &self.handles {
            if let Some(consumer) = handle.upgrade() {
                consumer.kill();
            }
        }
    }
}

impl fmt::Debug for ConsumerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerRegistry")
            .field("handles", &self.handles.len())
            .finish()
    }
}
