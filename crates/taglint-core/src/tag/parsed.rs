//! Simple-form parsing of a single dialect value (`name[,opt...]` or `-`)

/// A dialect value split into its name and option tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTag {
    /// Name segment before the first comma; empty means "use the field name"
    pub name: String,
    /// The value was exactly `-`
    pub skip: bool,
    /// Every option token after the name, in source order, duplicates kept
    pub options: Vec<String>,
    /// Option tokens that the dialect does not recognize
    pub invalid_options: Vec<String>,
}

impl ParsedTag {
    /// Parse a dialect value, sorting options into known and invalid ones.
    ///
    /// `known_options` is the dialect's recognized option set. A value of exactly `-`
    /// yields a skip marker with nothing else populated.
    pub fn parse(value: &str, known_options: &[&str]) -> Self {
        if value == super::SKIP_MARKER {
            return Self {
                skip: true,
                ..Self::default()
            };
        }

        let mut segments = value.split(',');
        let name = segments.next().unwrap_or_default().to_string();
        let options: Vec<String> = segments.map(str::to_string).collect();
        let invalid_options = options
            .iter()
            .filter(|opt| !known_options.contains(&opt.as_str()))
            .cloned()
            .collect();

        Self {
            name,
            skip: false,
            options,
            invalid_options,
        }
    }

    /// Check whether an option token is present
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}
