use super::component::Component;

/// Where a binding's slice key comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeySource {
    /// Derive the key from the component's display name, then its name.
    #[default]
    Derive,
    /// Use this key. An empty key falls back to [`KeySource::Derive`].
    Explicit(String),
    /// Bind without a slice.
    Stateless,
}

impl From<&str> for KeySource {
    fn from(key: &str) -> Self {
        Self::Explicit(key.to_string())
    }
}

impl From<String> for KeySource {
    fn from(key: String) -> Self {
        Self::Explicit(key)
    }
}

/// Lowercase the first character, leaving the rest unchanged.
///
/// ```
/// use slicebind::lower_camel_case;
///
/// assert_eq!(lower_camel_case("UserPanel"), "userPanel");
/// assert_eq!(lower_camel_case("HTTPStatus"), "hTTPStatus");
/// ```
pub fn lower_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the slice key for `component`.
///
/// Returns `None` for stateless bindings and for anonymous components.
pub fn derive_state_key<C>(component: &C, source: &KeySource) -> Option<String>
where
    C: Component + ?Sized,
{
    match source {
        KeySource::Explicit(key) if !key.is_empty() => Some(key.clone()),
        KeySource::Stateless => None,
        KeySource::Explicit(_) | KeySource::Derive => component
            .display_name()
            .filter(|name| !name.is_empty())
            .or_else(|| component.name().filter(|name| !name.is_empty()))
            .map(lower_camel_case),
    }
}
