/// Scene-file color spellings.
pub mod color;
