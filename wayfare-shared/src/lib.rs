pub mod money;
pub mod pii;

pub use money::to_minor_units;
pub use pii::Masked;
