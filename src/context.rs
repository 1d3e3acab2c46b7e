//! Role context for a freshly spawned surface.
//!
//! Every surface loads the same bundle; a query-string-shaped context tells
//! it what to render. The coordinator passes the string at spawn time (the
//! `PELMET_CONTEXT` environment variable or an explicit launch payload), so
//! children never need a DOM API to learn their role.

use crate::constants::CONTEXT_ENV_VAR;

/// The role a freshly loaded surface plays.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleContext {
    /// No `window` or `popover` parameter: this is the coordinator.
    Coordinator,
    /// Render only the inline window declaration with this id.
    InlineWindow { id: String },
    /// Render only the popover content with this id.
    Popover {
        id: String,
        /// Host-computed height budget, when provided.
        max_height: Option<f64>,
    },
}

impl RoleContext {
    /// Parses a context from a query string like `popover=media&max_height=828`.
    ///
    /// A leading `?` is tolerated. Unknown parameters are ignored; `window`
    /// wins over `popover` if both are present (a malformed spawn), matching
    /// the order the parameters are documented in.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut window = None;
        let mut popover = None;
        let mut max_height = None;

        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, value),
                None => (pair, ""),
            };
            match key {
                "window" if !value.is_empty() => window = Some(value.to_string()),
                "popover" if !value.is_empty() => popover = Some(value.to_string()),
                "max_height" => max_height = value.parse::<f64>().ok(),
                _ => {}
            }
        }

        match (window, popover) {
            (Some(id), _) => Self::InlineWindow { id },
            (None, Some(id)) => Self::Popover { id, max_height },
            (None, None) => Self::Coordinator,
        }
    }

    /// Reads the context from the process environment.
    ///
    /// Absence of the variable means this process is the coordinator.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(CONTEXT_ENV_VAR) {
            Ok(query) => Self::from_query(&query),
            Err(_) => Self::Coordinator,
        }
    }

    /// Renders the context back into the query string handed to a spawn.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Coordinator => String::new(),
            Self::InlineWindow { id } => format!("window={id}"),
            Self::Popover { id, max_height: None } => format!("popover={id}"),
            Self::Popover { id, max_height: Some(max) } => {
                format!("popover={id}&max_height={}", *max as u64)
            }
        }
    }

    /// Whether this surface is the coordinator.
    #[must_use]
    pub const fn is_coordinator(&self) -> bool { matches!(self, Self::Coordinator) }
}
