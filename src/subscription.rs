//! Event subscriptions with a guaranteed, symmetric release.
//!
//! A host keeps a [`Listeners`] table and only delivers events on channels that currently have a
//! live [`Subscription`]. Dropping a subscription releases it, as does calling
//! [`Subscription::dispose`]; either way it is released exactly once, whichever exit path the
//! owning view takes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Event sources the tracker can listen to.
pub enum Channel {
    /// Scroll position changes of the document.
    Scroll,
    /// Viewport size changes.
    Resize,
    /// Intersection batches for observed elements.
    Intersection,
    /// Nodes inserted into or removed from the document.
    Mutation,
}

impl Channel {
    /// Every channel, in the order the tracker subscribes to them.
    pub const ALL: [Self; 4] = [Self::Scroll, Self::Resize, Self::Intersection, Self::Mutation];
}

type Table = RefCell<HashMap<Channel, usize>>;

#[derive(Clone, Default, Debug)]
/// Live listener counts per channel, shared between a host and the subscriptions it handed out.
pub struct Listeners {
    table: Rc<Table>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Registers a listener on `channel`; it stays registered until the returned handle is released.
    pub fn subscribe(&self, channel: Channel) -> Subscription {
        *self.table.borrow_mut().entry(channel).or_default() += 1;
        log::trace!("subscribed to {channel:?}");
        Subscription {
            channel,
            table: Rc::downgrade(&self.table),
            released: false,
        }
    }

    #[must_use]
    pub fn count(&self, channel: Channel) -> usize {
        self.table.borrow().get(&channel).copied().unwrap_or(0)
    }

    #[must_use]
    /// Whether events on `channel` should be delivered at all.
    pub fn is_listening(&self, channel: Channel) -> bool {
        self.count(channel) > 0
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.table.borrow().values().sum()
    }
}

#[derive(Debug)]
#[must_use = "dropping a subscription releases it immediately"]
/// Handle for one registered listener.
pub struct Subscription {
    channel: Channel,
    table: Weak<Table>,
    released: bool,
}

impl Subscription {
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Releases the listener now.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // The host may already be gone, in which case there is nothing left to deregister from.
        if let Some(table) = self.table.upgrade() {
            let mut table = table.borrow_mut();
            if let Some(count) = table.get_mut(&self.channel) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    table.remove(&self.channel);
                }
            }
        }
        log::trace!("released {:?}", self.channel);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "tests/subscription.rs"]
mod tests;
