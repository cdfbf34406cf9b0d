use std::fmt;

type Disposer = Box<dyn FnOnce() + Send>;

/// Host callbacks to run when a session is torn down
#[derive(Default)]
pub struct Subscriptions {
    disposers: Vec<Disposer>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disposer, run once by [`Subscriptions::dispose`]
    pub fn add(&mut self, disposer: impl FnOnce() + Send + 'static) {
        self.disposers.push(Box::new(disposer));
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    /// Run every disposer in registration order and forget them
    pub fn dispose(&mut self) {
        for disposer in self.disposers.drain(..) {
            disposer();
        }
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.disposers.len())
            .finish()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}
