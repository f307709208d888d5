use std::env::args_os;
use std::process::exit;

use pixelkit::{brighten_image, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    if let Err(e) = brighten_image(&arguments) {
        eprintln!("Brightening failed because of: {}", e);
        exit(1);
    }
}
