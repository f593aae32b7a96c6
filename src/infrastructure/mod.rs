//! Infrastructure layer - concrete snapshot stores, bundled defaults and terminal I/O

pub mod defaults;
pub mod prompter;
pub mod storage;

pub use defaults::*;
pub use prompter::*;
pub use storage::*;
