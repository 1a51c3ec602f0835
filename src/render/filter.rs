use crate::render::options::NameFilter;

/// Engine names carry a leading `/`.
pub fn strip_name_prefix(name: &str) -> &str {
    name.trim_start_matches('/')
}

impl NameFilter {
    pub fn pattern(&self) -> &str {
        match self {
            NameFilter::CaseSensitive(p) | NameFilter::CaseInsensitive(p) => p,
        }
    }

    /// A container passes only if every one of its names contains the
    /// pattern. Names are compared without their `/` prefix.
    pub fn matches(&self, names: &[String]) -> bool {
        match self {
            NameFilter::CaseSensitive(pattern) => names
                .iter()
                .all(|name| strip_name_prefix(name).contains(pattern.as_str())),
            NameFilter::CaseInsensitive(pattern) => {
                let pattern = pattern.to_lowercase();
                names
                    .iter()
                    .all(|name| strip_name_prefix(name).to_lowercase().contains(&pattern))
            }
        }
    }
}
