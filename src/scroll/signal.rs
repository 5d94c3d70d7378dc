use std::sync::mpsc;

/// Identity of one subscription on a [`Signal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end of a [`Signal`] subscription.
///
/// Notifications queue up in publish order until drained. Dropping the subscription detaches it;
/// the signal prunes it on the next publish.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: mpsc::Receiver<T>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next pending notification, if any.
    pub fn try_next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Iterate over all pending notifications without blocking.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        self.rx.try_iter()
    }
}

/// Observable value with change notifications.
///
/// A single producer publishes with [`Signal::set`]; any number of consumers hold a
/// [`Subscription`] each. Delivery is in order per subscriber; nothing is promised about order
/// across subscribers.
#[derive(Debug)]
pub struct Signal<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, mpsc::Sender<T>)>,
    next_id: u64,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Store `value` and notify subscribers. Returns `false` (and notifies nobody) when the value
    /// did not change.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        let v = &self.value;
        self.subscribers.retain(|(_, tx)| tx.send(v.clone()).is_ok());
        true
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = mpsc::channel();
        self.subscribers.push((id, tx));
        Subscription { id, rx }
    }

    /// Detach `sub`. Returns `false` if no subscriber with its id is attached.
    pub fn unsubscribe(&mut self, sub: Subscription<T>) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != sub.id);
        before != self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/signal.rs"]
mod tests;
