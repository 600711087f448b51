//! A1 ranges for the data tab of a monthly spreadsheet.

/// Where order rows live inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    tab: String,
    scan_max_rows: u32,
}

impl SheetLayout {
    #[must_use]
    pub fn new(tab: &str, scan_max_rows: u32) -> Self {
        Self {
            tab: tab.to_owned(),
            scan_max_rows,
        }
    }

    /// The tab name as it must appear in a range: quoted with `'` unless
    /// it is plain alphanumeric.
    fn tab_ref(&self) -> String {
        if !self.tab.is_empty() && self.tab.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.tab.clone()
        } else {
            format!("'{}'", self.tab.replace('\'', "''"))
        }
    }

    /// Anchor cell for appends and overwrites.
    #[must_use]
    pub fn anchor(&self) -> String {
        format!("{}!A1", self.tab_ref())
    }

    /// Bounded window read before appending: columns A to Z, the first
    /// `scan_max_rows` rows. Orders beyond it are invisible to the
    /// duplicate check.
    #[must_use]
    pub fn scan_range(&self) -> String {
        format!("{}!A1:Z{}", self.tab_ref(), self.scan_max_rows)
    }

    /// The whole tab.
    #[must_use]
    pub fn whole_tab(&self) -> String {
        self.tab_ref()
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new("Sheet1", 1000)
    }
}
