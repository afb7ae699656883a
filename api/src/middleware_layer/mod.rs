pub mod json_extractor;
