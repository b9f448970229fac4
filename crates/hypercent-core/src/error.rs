use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigNotFound,
    ConfigParseError,
    IncompleteDatasetRecord,
    InputNotFound,
    InputUnreadable,
    InvalidToken,
    ReservedNodeId,
    HyperedgeIdOverflow,
    OutputWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::IncompleteDatasetRecord => "E1003",
            Self::InputNotFound => "E2001",
            Self::InputUnreadable => "E2002",
            Self::InvalidToken => "E2003",
            Self::ReservedNodeId => "E2004",
            Self::HyperedgeIdOverflow => "E2005",
            Self::OutputWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigNotFound => "Config file not found",
            Self::ConfigParseError => "Config file parse error",
            Self::IncompleteDatasetRecord => "Incomplete dataset record",
            Self::InputNotFound => "Input file not found",
            Self::InputUnreadable => "Input file unreadable",
            Self::InvalidToken => "Invalid node id token",
            Self::ReservedNodeId => "Node id inside the hyperedge id range",
            Self::HyperedgeIdOverflow => "Hyperedge id out of range",
            Self::OutputWriteFailed => "Result file write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound => {
                Some("Pass --config, or create hypercent.toml in the working directory.")
            }
            Self::ConfigParseError => Some("Fix syntax in hypercent.toml and retry."),
            Self::IncompleteDatasetRecord => Some(
                "Each dataset_init.txt record needs four lines: name, graph, hypergraph, output name.",
            ),
            Self::InputNotFound => Some("Check the dataset paths in the config file."),
            Self::InputUnreadable => Some("Check file permissions and encoding."),
            Self::InvalidToken => Some("Node ids must be base-10 integers separated by whitespace."),
            Self::ReservedNodeId => {
                Some("Raise [engine].hyperedge_offset above the largest node id.")
            }
            Self::HyperedgeIdOverflow => Some(
                "Lower [engine].hyperedge_offset (or --offset) so every hyperedge gets an id.",
            ),
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 10] = [
        ErrorCode::ConfigNotFound,
        ErrorCode::ConfigParseError,
        ErrorCode::IncompleteDatasetRecord,
        ErrorCode::InputNotFound,
        ErrorCode::InputUnreadable,
        ErrorCode::InvalidToken,
        ErrorCode::ReservedNodeId,
        ErrorCode::HyperedgeIdOverflow,
        ErrorCode::OutputWriteFailed,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(ErrorCode::ReservedNodeId.to_string(), "E2004");
    }
}
