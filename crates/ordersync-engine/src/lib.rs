//! Order-to-spreadsheet synchronisation: monthly grouping, sheet
//! provisioning, header-aligned writes, duplicate checks and the reset and
//! push orchestrators built on them.

pub mod adapters;
pub mod error;
pub mod grouper;
pub mod guard;
pub mod layout;
pub mod ports;
pub mod provisioner;
pub mod push;
pub mod reset;
pub mod settings;
pub mod writer;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

#[cfg(test)]
mod fixtures;

pub use error::{CollaboratorError, Phase, SyncError};
pub use grouper::{group_by_month, MonthlyGroups};
pub use layout::SheetLayout;
pub use ports::{DocumentStore, OrderSource, OrderWindow};
pub use push::{PushAction, PushOrchestrator, PushReport};
pub use reset::{MonthReport, ResetOrchestrator, ResetRequest, ResetSummary};
pub use settings::SyncSettings;
