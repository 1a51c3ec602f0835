use crate::docker::ListRequest;

/// Substring filter over container names. Being one enum, at most one of
/// the case-sensitive and case-insensitive patterns can ever be active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    CaseSensitive(String),
    CaseInsensitive(String),
}

/// Display options for one rendering. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Include stopped containers. Applied by the engine, not the renderer.
    pub all: bool,
    pub show_sizes: bool,
    /// Identifiers only, one per line.
    pub quiet: bool,
    pub no_trunc: bool,
    pub colorize: bool,
    pub name_filter: Option<NameFilter>,
    /// Requested column names, in display order. Empty means the default set.
    pub columns: Vec<String>,
}

impl RenderOptions {
    /// Engine request for these options. `show_sizes` is the effective
    /// value after column resolution.
    pub fn list_request(&self, show_sizes: bool) -> ListRequest {
        ListRequest {
            include_stopped: self.all,
            include_sizes: show_sizes && !self.quiet,
        }
    }
}
