//! Deferred image loading.

use std::collections::HashMap;

/// Opacity applied to images that failed to load.
pub const ERRORED_OPACITY: f64 = 0.6;

/// Inline SVG placeholder shown while a deferred source is pending.
pub const PLACEHOLDER_SRC: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzAwIiBoZWlnaHQ9IjIwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZGRkIi8+PC9zdmc+";

/// Lifecycle of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Already had a resolved source at setup; shown immediately.
    EagerVisible,
    /// Deferred source, placeholder shown, waiting for proximity.
    Pending,
    /// Deferred source assigned and confirmed loaded.
    Loaded,
    /// Load failed; stays at reduced opacity, no retry.
    Errored,
}

/// One tracked image.
#[derive(Debug, Clone)]
pub struct LazyImage {
    state: ImageState,
    deferred_src: Option<String>,
}

impl LazyImage {
    /// Classify an image from its setup-time attributes.
    ///
    /// A deferred-source marker without an already-resolved source makes
    /// the image pending; anything with a resolved source is eager.
    #[must_use]
    pub fn from_attributes(src: Option<&str>, deferred_src: Option<&str>) -> Self {
        let resolved = src.is_some_and(|s| s.starts_with("http") || s.contains("imagens/"));
        match deferred_src {
            Some(deferred) if !resolved => Self {
                state: ImageState::Pending,
                deferred_src: Some(deferred.to_string()),
            },
            _ => Self {
                state: ImageState::EagerVisible,
                deferred_src: None,
            },
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ImageState {
        self.state
    }
}

/// All tracked images, keyed by element.
#[derive(Debug, Default)]
pub struct LazyImages {
    images: HashMap<String, LazyImage>,
}

impl LazyImages {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an image under the given key.
    pub fn insert(&mut self, key: impl Into<String>, image: LazyImage) {
        self.images.insert(key.into(), image);
    }

    /// State of the keyed image.
    #[must_use]
    pub fn state(&self, key: &str) -> Option<ImageState> {
        self.images.get(key).map(LazyImage::state)
    }

    /// Proximity intersection: returns the source to assign for a pending
    /// image, `None` otherwise. The transition to `Loaded` is confirmed
    /// separately by [`LazyImages::mark_loaded`].
    pub fn on_intersect(&mut self, key: &str) -> Option<String> {
        let image = self.images.get_mut(key)?;
        if image.state != ImageState::Pending {
            return None;
        }
        image.deferred_src.take()
    }

    /// The underlying load signal fired.
    pub fn mark_loaded(&mut self, key: &str) {
        if let Some(image) = self.images.get_mut(key) {
            image.state = ImageState::Loaded;
        }
    }

    /// The underlying load failed. Errored images are never retried.
    pub fn mark_errored(&mut self, key: &str) {
        if let Some(image) = self.images.get_mut(key) {
            image.state = ImageState::Errored;
            tracing::warn!(key, "image failed to load");
        }
    }

    /// Keys of still-pending images, for the observer-unavailable
    /// fallback (resolve everything immediately, eager not deferred).
    #[must_use]
    pub fn pending_keys(&self) -> Vec<String> {
        self.images
            .iter()
            .filter(|(_, image)| image.state == ImageState::Pending)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_source_is_eager() {
        let image = LazyImage::from_attributes(Some("https://cdn.example/a.jpg"), None);
        assert_eq!(image.state(), ImageState::EagerVisible);

        let local = LazyImage::from_attributes(Some("imagens/perfil.jpg"), Some("imagens/x.jpg"));
        assert_eq!(local.state(), ImageState::EagerVisible);
    }

    #[test]
    fn deferred_marker_without_source_is_pending() {
        let image = LazyImage::from_attributes(None, Some("imagens/galeria-1.jpg"));
        assert_eq!(image.state(), ImageState::Pending);
    }

    #[test]
    fn pending_resolves_on_intersection_then_load() {
        let mut images = LazyImages::new();
        images.insert(
            "img-0",
            LazyImage::from_attributes(None, Some("imagens/galeria-1.jpg")),
        );

        let src = images.on_intersect("img-0");
        assert_eq!(src.as_deref(), Some("imagens/galeria-1.jpg"));
        // Source handed out once only.
        assert_eq!(images.on_intersect("img-0"), None);

        images.mark_loaded("img-0");
        assert_eq!(images.state("img-0"), Some(ImageState::Loaded));
    }

    #[test]
    fn load_failure_is_terminal() {
        let mut images = LazyImages::new();
        images.insert("img-1", LazyImage::from_attributes(None, Some("imagens/a.jpg")));
        images.on_intersect("img-1");
        images.mark_errored("img-1");
        assert_eq!(images.state("img-1"), Some(ImageState::Errored));
        // No retry path: intersecting again hands out nothing.
        assert_eq!(images.on_intersect("img-1"), None);
    }

    #[test]
    fn eager_images_never_hand_out_a_source() {
        let mut images = LazyImages::new();
        images.insert("img-2", LazyImage::from_attributes(Some("https://x/y.png"), None));
        assert_eq!(images.on_intersect("img-2"), None);
    }

    #[test]
    fn pending_keys_lists_only_unresolved_images() {
        let mut images = LazyImages::new();
        images.insert("a", LazyImage::from_attributes(None, Some("imagens/1.jpg")));
        images.insert("b", LazyImage::from_attributes(Some("https://x/2.jpg"), None));
        images.insert("c", LazyImage::from_attributes(None, Some("imagens/3.jpg")));

        let mut pending = images.pending_keys();
        pending.sort();
        assert_eq!(pending, vec!["a", "c"]);
    }
}
