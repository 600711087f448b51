use ordersync_core::MonthKey;
use ordersync_google::GoogleError;
use ordersync_shopify::ShopifyError;
use thiserror::Error;

/// Failure of a single call to the order source or the document store.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("order source: {0}")]
    OrderSource(#[from] ShopifyError),

    #[error("document store: {0}")]
    DocumentStore(#[from] GoogleError),
}

/// Step of an orchestrator run, named in [`SyncError::OperationFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetching,
    Emptying,
    Locating,
    Provisioning,
    Reading,
    Writing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fetching => "fetching orders",
            Self::Emptying => "emptying folder",
            Self::Locating => "locating sheet",
            Self::Provisioning => "provisioning sheet",
            Self::Reading => "reading sheet",
            Self::Writing => "writing sheet",
        })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad reset secret or untrusted push source.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Unparseable timestamp, missing order fields or a bad reset window.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An orchestrator step failed. `months` is empty for steps that do not
    /// belong to a month; `source` is absent when several months failed.
    #[error("{phase} failed{}", month_suffix(.months))]
    OperationFailed {
        phase: Phase,
        months: Vec<MonthKey>,
        #[source]
        source: Option<CollaboratorError>,
    },
}

impl SyncError {
    pub(crate) fn failed(phase: Phase, month: Option<&MonthKey>, source: CollaboratorError) -> Self {
        Self::OperationFailed {
            phase,
            months: month.cloned().into_iter().collect(),
            source: Some(source),
        }
    }
}

fn month_suffix(months: &[MonthKey]) -> String {
    if months.is_empty() {
        return String::new();
    }
    let list: Vec<&str> = months.iter().map(MonthKey::as_str).collect();
    format!(" for {}", list.join(", "))
}
