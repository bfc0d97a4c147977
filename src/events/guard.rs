/// Something hooked into the page that has to be unhooked exactly once.
pub trait Detach {
    fn detach(&mut self);
}

/// Owns one attachment. Dropping it detaches.
pub struct Attached<D: Detach>(Option<D>);

impl<D: Detach> Attached<D> {
    pub fn new(inner: D) -> Self {
        Self(Some(inner))
    }

    pub fn is_attached(&self) -> bool {
        self.0.is_some()
    }

    pub fn detach_now(&mut self) {
        if let Some(mut inner) = self.0.take() {
            inner.detach();
        }
    }
}

impl<D: Detach> Drop for Attached<D> {
    fn drop(&mut self) {
        self.detach_now();
    }
}

/// Every attachment a mounted background owns; released together on teardown.
pub struct AttachedSet<D: Detach> {
    items: Vec<Attached<D>>,
}

impl<D: Detach> Default for AttachedSet<D> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<D: Detach> AttachedSet<D> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn release(&mut self) {
        for mut a in self.items.drain(..) {
            a.detach_now();
        }
    }
}

impl<D: Detach> Extend<Attached<D>> for AttachedSet<D> {
    fn extend<I: IntoIterator<Item = Attached<D>>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
