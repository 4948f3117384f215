//! Type-erased registry entries for feature slices.
//!
//! Every slice is constructed explicitly at start-up and handed to the application
//! state, which later resolves it by type.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Shared state of a feature slice.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Downcasting hook for the registry.
    fn as_any(&self) -> &dyn Any;
}

/// A constructed slice ready to be registered.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), state: Box::new(state) }
    }

    /// Returns the slice state when it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
