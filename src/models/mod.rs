pub mod outcome;
pub mod section;

pub use outcome::{DriveStage, Outcome};
pub use section::{
    DiscoveredItem, ItemRecord, ItemStatus, MarkerKind, ProgressState, SectionRecord,
};
