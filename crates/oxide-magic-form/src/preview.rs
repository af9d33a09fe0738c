//! Image previews.
//!
//! Choosing a file for an image field acquires a displayable URL from a
//! [`PreviewProvider`]. [`PreviewState`] owns those handles and gives each one
//! back when the field's file changes, when the form is reset and when the
//! state is dropped.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::value::FileRef;

/// A displayable URL for a chosen file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of preview URLs.
pub trait PreviewProvider {
    /// Acquires a URL displaying `file`.
    fn create(&mut self, file: &FileRef) -> PreviewUrl;

    /// Releases a URL returned by [`PreviewProvider::create`].
    fn revoke(&mut self, url: &PreviewUrl);
}

/// Mints `blob:` URLs and tracks which ones are still live.
#[derive(Debug)]
pub struct ObjectUrlRegistry {
    origin: String,
    next: u64,
    live: HashSet<PreviewUrl>,
}

impl ObjectUrlRegistry {
    /// Creates a registry minting URLs under `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            next: 0,
            live: HashSet::new(),
        }
    }

    /// Returns the number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, url: &PreviewUrl) -> bool {
        self.live.contains(url)
    }
}

impl Default for ObjectUrlRegistry {
    fn default() -> Self {
        Self::new("oxide-magic-form")
    }
}

impl PreviewProvider for ObjectUrlRegistry {
    fn create(&mut self, _file: &FileRef) -> PreviewUrl {
        self.next += 1;
        let url = PreviewUrl(format!("blob:{}/{}", self.origin, self.next));
        self.live.insert(url.clone());
        url
    }

    fn revoke(&mut self, url: &PreviewUrl) {
        if !self.live.remove(url) {
            warn!(url = %url, "Revoking preview URL that is not live");
        }
    }
}

/// Preview URLs keyed by image field name.
pub struct PreviewState {
    provider: Box<dyn PreviewProvider>,
    previews: HashMap<String, PreviewUrl>,
}

impl PreviewState {
    /// Creates an empty state backed by `provider`.
    pub fn new(provider: impl PreviewProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            previews: HashMap::new(),
        }
    }

    /// Replaces the preview of `field` with one for `file`.
    pub fn set(&mut self, field: &str, file: &FileRef) -> &PreviewUrl {
        self.release(field);
        let url = self.provider.create(file);
        debug!(field = %field, url = %url, "Created image preview");
        self.previews.entry(field.to_string()).or_insert(url)
    }

    /// Releases the preview of `field`, if any.
    pub fn release(&mut self, field: &str) {
        if let Some(url) = self.previews.remove(field) {
            debug!(field = %field, url = %url, "Revoked image preview");
            self.provider.revoke(&url);
        }
    }

    /// Releases every preview.
    pub fn release_all(&mut self) {
        for (_, url) in self.previews.drain() {
            self.provider.revoke(&url);
        }
    }

    pub fn get(&self, field: &str) -> Option<&PreviewUrl> {
        self.previews.get(field)
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new(ObjectUrlRegistry::default())
    }
}

impl fmt::Debug for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewState")
            .field("previews", &self.previews)
            .finish_non_exhaustive()
    }
}

impl Drop for PreviewState {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder {
        created: Rc<RefCell<Vec<String>>>,
        revoked: Rc<RefCell<Vec<String>>>,
    }

    impl PreviewProvider for Recorder {
        fn create(&mut self, file: &FileRef) -> PreviewUrl {
            let url = format!("test:{}", file.name);
            self.created.borrow_mut().push(url.clone());
            PreviewUrl::new(url)
        }

        fn revoke(&mut self, url: &PreviewUrl) {
            self.revoked.borrow_mut().push(url.to_string());
        }
    }

    #[test]
    fn test_registry_mints_unique_urls() {
        let mut registry = ObjectUrlRegistry::new("app");
        let a = registry.create(&FileRef::new("a.png"));
        let b = registry.create(&FileRef::new("a.png"));
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "blob:app/1");
        assert_eq!(registry.live_count(), 2);

        registry.revoke(&a);
        assert!(!registry.is_live(&a));
        assert!(registry.is_live(&b));
    }

    #[test]
    fn test_replacing_revokes_previous() {
        let recorder = Recorder::default();
        let mut state = PreviewState::new(recorder.clone());

        state.set("avatar", &FileRef::new("one.png"));
        state.set("avatar", &FileRef::new("two.png"));

        assert_eq!(state.get("avatar").unwrap().as_str(), "test:two.png");
        assert_eq!(*recorder.revoked.borrow(), vec!["test:one.png"]);
    }

    #[test]
    fn test_drop_revokes_all() {
        let recorder = Recorder::default();
        {
            let mut state = PreviewState::new(recorder.clone());
            state.set("avatar", &FileRef::new("a.png"));
            state.set("banner", &FileRef::new("b.png"));
        }
        let mut revoked = recorder.revoked.borrow().clone();
        revoked.sort();
        assert_eq!(revoked, vec!["test:a.png", "test:b.png"]);
    }
}
