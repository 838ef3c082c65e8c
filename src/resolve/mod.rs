// Mon Oct 19 2026 - Alex

pub mod atomic;
pub mod child_order;
pub mod overrides;
pub mod session;
pub mod status;

pub use atomic::{disambiguated_name, AtomicRegistry};
pub use child_order::{order_children, MAX_REORDER_PASSES};
pub use overrides::OverrideSet;
pub use session::ResolutionSession;
pub use status::{ResolutionStatus, StatusMap};
