use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    yine_negatives::example_apps::run_rule_probe(std::env::args().skip(1))
}
