//! Application state and dependency injection.

use docqa_opendal::ObjectStorage;
use docqa_rag::RagService;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    rag_service: RagService,
    object_storage: ObjectStorage,
}

impl ServiceState {
    /// Creates application state from already-constructed services.
    pub fn new(rag_service: RagService, object_storage: ObjectStorage) -> Self {
        Self {
            rag_service,
            object_storage,
        }
    }

    /// Returns the question answering service.
    pub fn rag_service(&self) -> &RagService {
        &self.rag_service
    }

    /// Returns the object storage client.
    pub fn object_storage(&self) -> &ObjectStorage {
        &self.object_storage
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(rag_service: RagService);
impl_di!(object_storage: ObjectStorage);
