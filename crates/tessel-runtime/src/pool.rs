use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock-guarded LIFO stack shared between threads.
pub struct AtomicBag<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for AtomicBag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AtomicBag<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-modified
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, item: T) {
        self.lock().push(item);
    }

    /// Pops the most recently added item.
    ///
    /// Panics when the bag is empty; use [`AtomicBag::try_take`] when that
    /// is a legitimate state.
    pub fn take(&self) -> T {
        match self.try_take() {
            Some(item) => item,
            None => panic!("take() on an empty AtomicBag"),
        }
    }

    pub fn try_take(&self) -> Option<T> {
        self.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes every item, most recent first.
    pub fn drain(&self) -> Vec<T> {
        let mut items = std::mem::take(&mut *self.lock());
        items.reverse();
        items
    }
}

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type Reset<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Object pool over an [`AtomicBag`]: `acquire` never fails, constructing a
/// fresh value when the bag is empty.
pub struct Pool<T> {
    bag: AtomicBag<T>,
    factory: Factory<T>,
    reset: Option<Reset<T>>,
    created: AtomicUsize,
}

impl<T> Pool<T> {
    pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            bag: AtomicBag::new(),
            factory: Box::new(factory),
            reset: None,
            created: AtomicUsize::new(0),
        }
    }

    /// Hook run on every released value before it is stored.
    pub fn with_reset(mut self, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    pub fn acquire(&self) -> T {
        if let Some(item) = self.bag.try_take() {
            return item;
        }
        self.created.fetch_add(1, Ordering::Relaxed);
        (self.factory)()
    }

    pub fn release(&self, mut item: T) {
        if let Some(reset) = &self.reset {
            reset(&mut item);
        }
        self.bag.add(item);
    }

    /// Acquires a value that returns to the pool when dropped.
    pub fn guard(&self) -> Pooled<'_, T> {
        Pooled {
            item: Some(self.acquire()),
            pool: self,
        }
    }

    /// Values currently sitting in the pool.
    pub fn available(&self) -> usize {
        self.bag.len()
    }

    /// Total factory constructions so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    /// Fills the pool up to `count` idle values.
    pub fn prewarm(&self, count: usize) {
        while self.available() < count {
            self.created.fetch_add(1, Ordering::Relaxed);
            self.bag.add((self.factory)());
        }
    }

    /// Empties the pool, handing back every idle value.
    pub fn drain(&self) -> Vec<T> {
        self.bag.drain()
    }
}

pub struct Pooled<'pool, T> {
    item: Option<T>,
    pool: &'pool Pool<T>,
}

impl<T> Pooled<'_, T> {
    /// Detaches the value so it is not returned on drop.
    pub fn into_inner(mut self) -> T {
        match self.item.take() {
            Some(item) => item,
            None => unreachable!("pooled value already taken"),
        }
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled value already released"),
        }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled value already released"),
        }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_is_lifo() {
        let bag = AtomicBag::new();
        bag.add(1);
        bag.add(2);
        bag.add(3);
        assert_eq!(bag.take(), 3);
        assert_eq!(bag.drain(), vec![2, 1]);
        assert!(bag.is_empty());
        assert_eq!(bag.try_take(), None);
    }

    #[test]
    #[should_panic(expected = "empty AtomicBag")]
    fn take_on_empty_panics() {
        let bag: AtomicBag<u8> = AtomicBag::new();
        bag.take();
    }
}
