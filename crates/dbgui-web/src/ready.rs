#![forbid(unsafe_code)]

//! `document.readyState`, read as its string value.

/// Parse state of the page document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Map the DOM string; values newer than this list count as complete.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }

    /// `<body>` exists once parsing has finished.
    #[must_use]
    pub fn allows_attach(self) -> bool {
        self != Self::Loading
    }
}
