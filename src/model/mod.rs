/// Error families and link functions.
pub mod family;
/// The model handle, its variants, and JSON loading.
pub mod handle;
/// Decoding of coefficient names into columns, factor levels, and interactions.
pub mod terms;

pub use family::{Family, Link};
pub use handle::{Coefficient, ModelHandle, ModelVariant};
