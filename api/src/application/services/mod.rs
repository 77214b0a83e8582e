pub mod gravatar;
pub mod passwords;
pub mod tokens;
pub mod validation;
