//! Consumer-visible binding state

/// `{data, loading, error}` as published by a binding
///
/// `generation` counts invocations; a settlement commits only while its
/// generation is still the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingState<D> {
    pub data: D,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
}

impl<D: Default> BindingState<D> {
    /// Fresh state: loading, no data, no error
    pub fn new() -> Self {
        Self {
            data: D::default(),
            loading: true,
            error: None,
            generation: 0,
        }
    }
}

impl<D: Default> Default for BindingState<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> BindingState<D> {
    /// Not loading and no error
    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    pub fn is_failed(&self) -> bool {
        !self.loading && self.error.is_some()
    }
}
