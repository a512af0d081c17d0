use crate::domain_port::TokenGenerator;

const TOKEN_LEN: usize = 43;

/// URL-safe random credentials from the OS RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    #[inline]
    fn generate(&self) -> String {
        nanoid::nanoid!(TOKEN_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_distinct_values() {
        let a = RandomTokenGenerator.generate();
        let b = RandomTokenGenerator.generate();
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }
}
