mod token_rotation;

pub use token_rotation::*;
