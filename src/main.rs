use std::process::exit;

fn main() {
    if let Err(err) = recipe_feed::app::run_cli() {
        eprintln!("{err}");
        exit(1);
    }
}
