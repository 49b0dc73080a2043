use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    yine_negatives::example_apps::run_generate_negatives(std::env::args().skip(1))
}
