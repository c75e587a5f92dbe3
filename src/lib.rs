pub mod cli;
pub mod docs;
pub mod generator;
pub mod outline;
pub mod parser;

pub fn get_highlight_styles() -> Vec<String> {
    generator::highlight::STYLES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
