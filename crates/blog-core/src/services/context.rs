use crate::domain::Viewer;
use crate::error::DomainError;

/// Per-request state threaded explicitly through every flow.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    viewer: Option<Viewer>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(viewer: Viewer) -> Self {
        Self {
            viewer: Some(viewer),
        }
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// The current viewer, or `Unauthenticated` for anonymous requests.
    pub fn require_viewer(&self) -> Result<&Viewer, DomainError> {
        self.viewer.as_ref().ok_or(DomainError::Unauthenticated)
    }
}

impl From<Option<Viewer>> for RequestContext {
    fn from(viewer: Option<Viewer>) -> Self {
        Self { viewer }
    }
}
