#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;

    pub type DefaultState = std::collections::hash_map::RandomState;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::HashMap;

    pub type DefaultState = ahash::RandomState;
}
