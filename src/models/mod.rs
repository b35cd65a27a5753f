pub mod cohort;
pub mod enums;
pub mod filters;
pub mod follow_up;
pub mod pathology;
pub mod patient;
pub mod surgery;
pub mod treatment;

pub use cohort::*;
pub use filters::*;
pub use follow_up::*;
pub use pathology::*;
pub use patient::*;
pub use surgery::*;
pub use treatment::*;
