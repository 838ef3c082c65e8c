// Mon Oct 19 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(e) = schema_cpp_generator::ui::cli::run() {
        eprintln!("{} {}", "[!]".red(), format!("{:#}", e).red());
        std::process::exit(1);
    }
}
