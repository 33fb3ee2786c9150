pub mod classifier;
pub mod discovery;
pub mod page_layout;
pub mod section_scanner;
pub mod signatures;

pub use classifier::{classify, Classification};
pub use discovery::Discovery;
pub use section_scanner::SectionScanner;
pub use signatures::SignatureTable;
