pub mod constants;
pub mod prompts;
pub mod tabular;
pub mod test_helpers;
pub mod types;
pub mod validation;
