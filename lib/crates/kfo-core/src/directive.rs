//! In-memory directive tree for one configuration fragment.
//!
//! A directive owns its parameters and its nested children exclusively; every
//! processor mutates the tree in place.

/// Reserved parameter holding the plugin type.
pub const PARAM_TYPE: &str = "@type";

/// Legacy spelling of [`PARAM_TYPE`] still accepted by the agent.
pub const PARAM_TYPE_LEGACY: &str = "type";

/// Label a `relabel` sink or a source routes its records to.
pub const PARAM_LABEL: &str = "@label";

/// Ordered sequence of top-level directives.
pub type Fragment = Vec<Directive>;

/// One `key value` pair inside a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Parameters of a directive.
///
/// Keys are unique. Insertion order is kept so that rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Returns the value for `name` unless it is missing or empty.
    #[must_use]
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Sets `name` to `value`, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.0.iter_mut().find(|p| p.name == name) {
            existing.value = value;
        } else {
            self.0.push(Param { name, value });
        }
    }

    /// Removes `name`, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|p| p.name == name)?;
        Some(self.0.remove(idx).value)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// A node of the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Structural keyword: `match`, `source`, `label`, ...
    pub name: String,
    /// Routing pattern or label identifier; empty when absent.
    pub tag: String,
    pub params: Params,
    pub nested: Fragment,
}

impl Directive {
    #[must_use]
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style parameter setter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(name, value);
        self
    }

    /// Builder-style child append.
    #[must_use]
    pub fn with_child(mut self, child: Directive) -> Self {
        self.nested.push(child);
        self
    }

    /// Value of `@type` (or the legacy `type`), or `""` when neither is set.
    #[must_use]
    pub fn plugin_type(&self) -> &str {
        self.params
            .get(PARAM_TYPE)
            .or_else(|| self.params.get(PARAM_TYPE_LEGACY))
            .unwrap_or("")
    }

    /// Sets `@type`, dropping a legacy `type` parameter if one exists.
    pub fn set_plugin_type(&mut self, plugin: impl Into<String>) {
        self.params.remove(PARAM_TYPE_LEGACY);
        self.params.set(PARAM_TYPE, plugin);
    }

    #[must_use]
    pub fn kind(&self) -> DirectiveKind {
        DirectiveKind::from_name(&self.name)
    }

    #[must_use]
    pub fn plugin(&self) -> PluginType {
        PluginType::from_name(self.plugin_type())
    }
}

/// Structural role of a directive, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Source,
    Match,
    Filter,
    Store,
    Label,
    Buffer,
    Other,
}

impl DirectiveKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "source" => Self::Source,
            "match" => Self::Match,
            "filter" => Self::Filter,
            "store" => Self::Store,
            "label" => Self::Label,
            "buffer" => Self::Buffer,
            _ => Self::Other,
        }
    }

    /// `match`, `store` and `filter` hand records to an output or filter plugin.
    #[must_use]
    pub fn is_plugin_host(self) -> bool {
        matches!(self, Self::Match | Self::Store | Self::Filter)
    }
}

/// Plugin types the processors care about; everything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginType {
    Exec,
    ExecFilter,
    Stdout,
    RewriteTagFilter,
    DetectExceptions,
    File,
    MountedFile,
    FieldsParser,
    Share,
    Relabel,
    Null,
    Other(String),
}

impl PluginType {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "exec" => Self::Exec,
            "exec_filter" => Self::ExecFilter,
            "stdout" => Self::Stdout,
            "rewrite_tag_filter" => Self::RewriteTagFilter,
            "detect_exceptions" => Self::DetectExceptions,
            "file" => Self::File,
            "mounted-file" => Self::MountedFile,
            "fields_parser" => Self::FieldsParser,
            "share" => Self::Share,
            "relabel" => Self::Relabel,
            "null" => Self::Null,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exec => "exec",
            Self::ExecFilter => "exec_filter",
            Self::Stdout => "stdout",
            Self::RewriteTagFilter => "rewrite_tag_filter",
            Self::DetectExceptions => "detect_exceptions",
            Self::File => "file",
            Self::MountedFile => "mounted-file",
            Self::FieldsParser => "fields_parser",
            Self::Share => "share",
            Self::Relabel => "relabel",
            Self::Null => "null",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for PluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
