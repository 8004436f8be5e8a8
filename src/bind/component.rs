use super::props::Props;

/// A UI component that can be bound to the store.
///
/// The names feed slice-key derivation; a component with neither is
/// anonymous and binds without a slice unless given an explicit key.
pub trait Component: Send + Sync {
    /// Human-readable display name, preferred for key derivation.
    fn display_name(&self) -> Option<&str> {
        None
    }

    /// Identifier name, used when there is no display name.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Render with merged props.
    fn render(&self, props: &Props);
}

/// A component backed by a closure. Built with [`component_fn`].
pub struct FnComponent<F> {
    display_name: Option<String>,
    render: F,
}

impl<F> FnComponent<F> {
    /// Give the component a display name.
    #[must_use]
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props) + Send + Sync,
{
    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn render(&self, props: &Props) {
        (self.render)(props)
    }
}

/// Create an anonymous component from a render closure.
#[must_use]
pub fn component_fn<F>(render: F) -> FnComponent<F>
where
    F: Fn(&Props) + Send + Sync,
{
    FnComponent {
        display_name: None,
        render,
    }
}
