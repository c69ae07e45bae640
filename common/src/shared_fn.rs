use std::sync::Arc;

/// Optional shared callback, cheap to clone across worker threads.
///
/// Generic over the function signature `F`, e.g. `dyn Fn(Progress) + Send + Sync`.
pub enum SharedFn<F: ?Sized + Send + Sync + 'static> {
    None,
    Some(Arc<F>),
}

impl<F: ?Sized + Send + Sync + 'static> Clone for SharedFn<F> {
    fn clone(&self) -> Self {
        match self {
            SharedFn::None => SharedFn::None,
            SharedFn::Some(f) => SharedFn::Some(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized + Send + Sync + 'static> Default for SharedFn<F> {
    fn default() -> Self {
        SharedFn::None
    }
}

impl<F: ?Sized + Send + Sync + 'static> SharedFn<F> {
    pub fn new(f: Arc<F>) -> Self {
        SharedFn::Some(f)
    }

    pub fn is_some(&self) -> bool {
        matches!(self, SharedFn::Some(_))
    }

    pub fn as_ref(&self) -> Option<&Arc<F>> {
        match self {
            SharedFn::None => None,
            SharedFn::Some(f) => Some(f),
        }
    }
}

impl<F: ?Sized + Send + Sync + 'static> std::fmt::Debug for SharedFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SharedFn::None => write!(f, "SharedFn::None"),
            SharedFn::Some(_) => write!(f, "SharedFn::Some(...)"),
        }
    }
}

impl<F: ?Sized + Send + Sync + 'static> From<Arc<F>> for SharedFn<F> {
    fn from(f: Arc<F>) -> Self {
        SharedFn::Some(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Callback = SharedFn<dyn Fn(usize) + Send + Sync>;

    #[test]
    fn default_is_none() {
        let callback = Callback::default();
        assert!(!callback.is_some());
        assert!(callback.as_ref().is_none());
    }

    #[test]
    fn clones_share_the_same_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: Callback = SharedFn::from(Arc::new(move |n: usize| {
            counter.fetch_add(n, Ordering::SeqCst);
        }) as Arc<dyn Fn(usize) + Send + Sync>);

        let cloned = callback.clone();
        (callback.as_ref().unwrap())(2);
        (cloned.as_ref().unwrap())(3);

        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
