//! Process-wide backend registry
//!
//! The legacy display-font engine is not reentrant. It lives here behind a
//! mutex, and every call into it holds the lock for the whole call. The
//! guard is dropped on every exit path, including errors.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use typa_core::error::{RenderError, Result};
use typa_core::traits::LegacyFontBackend;

/// Holds the optional legacy font engine
#[derive(Default)]
pub struct BackendRegistry {
    legacy: Mutex<Option<Box<dyn LegacyFontBackend>>>,
}

impl BackendRegistry {
    /// An empty registry, for tests or isolated annotators
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every annotator that does not bring its own
    pub fn global() -> Arc<BackendRegistry> {
        static GLOBAL: OnceLock<Arc<BackendRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| {
            log::info!("Backend registry initialized");
            Arc::new(BackendRegistry::new())
        }))
    }

    /// Installs the legacy engine and returns the one it replaces
    pub fn install_legacy_backend(
        &self,
        backend: Box<dyn LegacyFontBackend>,
    ) -> Option<Box<dyn LegacyFontBackend>> {
        let mut slot = self.legacy.lock();
        log::info!("Legacy font backend `{}` installed", backend.name());
        slot.replace(backend)
    }

    pub fn has_legacy_backend(&self) -> bool {
        self.legacy.lock().is_some()
    }

    /// Removes the legacy engine, waiting for any call in progress
    pub fn shutdown(&self) -> Option<Box<dyn LegacyFontBackend>> {
        let backend = self.legacy.lock().take();
        if let Some(backend) = &backend {
            log::info!("Legacy font backend `{}` shut down", backend.name());
        }
        backend
    }

    /// Runs `f` on the legacy engine with the lock held
    pub fn with_legacy<R>(
        &self,
        f: impl FnOnce(&mut dyn LegacyFontBackend) -> Result<R>,
    ) -> Result<R> {
        let mut slot = self.legacy.lock();
        match slot.as_deref_mut() {
            Some(backend) => f(backend),
            None => Err(RenderError::BackendUnavailable("legacy font engine".to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typa_core::attrs::DrawAttributes;
    use typa_core::canvas::Canvas;
    use typa_core::types::{Point, TypeMetric};

    struct Fixed(&'static str);

    impl LegacyFontBackend for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn measure(&mut self, _attrs: &DrawAttributes) -> Result<TypeMetric> {
            Ok(TypeMetric {
                width: 7.0,
                ..Default::default()
            })
        }

        fn render(
            &mut self,
            _canvas: &mut dyn Canvas,
            attrs: &DrawAttributes,
            _offset: Point,
        ) -> Result<TypeMetric> {
            self.measure(attrs)
        }
    }

    #[test]
    fn test_missing_backend_is_not_built_in() {
        let registry = BackendRegistry::new();
        assert!(!registry.has_legacy_backend());
        let err = registry
            .with_legacy(|b| b.measure(&DrawAttributes::new()))
            .unwrap_err();
        assert_eq!(err.tag(), "DelegateLibrarySupportNotBuiltIn");
    }

    #[test]
    fn test_install_replace_shutdown() {
        let registry = BackendRegistry::new();
        assert!(registry.install_legacy_backend(Box::new(Fixed("a"))).is_none());
        let old = registry.install_legacy_backend(Box::new(Fixed("b")));
        assert_eq!(old.map(|b| b.name().to_string()), Some("a".to_string()));

        let metrics = registry
            .with_legacy(|b| b.measure(&DrawAttributes::new()))
            .unwrap();
        assert_eq!(metrics.width, 7.0);

        assert!(registry.shutdown().is_some());
        assert!(!registry.has_legacy_backend());
    }

    #[test]
    fn test_lock_released_after_error() {
        let registry = BackendRegistry::new();
        registry.install_legacy_backend(Box::new(Fixed("a")));
        let failed: Result<()> = registry.with_legacy(|_| {
            Err(RenderError::DelegateFailed("boom".to_string()).into())
        });
        assert!(failed.is_err());
        // A second call would deadlock if the guard had leaked
        assert!(registry.with_legacy(|b| b.measure(&DrawAttributes::new())).is_ok());
    }

    #[test]
    fn test_global_is_shared() {
        let a = BackendRegistry::global();
        let b = BackendRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
