use crate::image::saturating_add::AddMethod;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_INPUT_FILE: &str = "pillars.png";
const DEFAULT_OUTPUT_FILE: &str = "output.png";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_increment_argument(command);
        let command = Self::register_alpha_increment_argument(command);
        let command = Self::register_add_method_argument(command);
        Self::register_flip_vertically_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_increment_argument(command: Command) -> Command {
        command.arg(Self::create_increment_argument())
    }

    fn register_alpha_increment_argument(command: Command) -> Command {
        command.arg(Self::create_alpha_increment_argument())
    }

    fn register_add_method_argument(command: Command) -> Command {
        command.arg(Self::create_add_method_argument())
    }

    fn register_flip_vertically_argument(command: Command) -> Command {
        command.arg(Self::create_flip_vertically_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to RGBA input image")
            .value_parser(value_parser!(PathBuf))
            .default_value(DEFAULT_INPUT_FILE)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to output image (png, bmp, tga or jpg)")
            .value_parser(value_parser!(PathBuf))
            .default_value(DEFAULT_OUTPUT_FILE)
    }

    fn create_increment_argument() -> Arg {
        arg!(-i --increment <VALUE> "Value added to red, green and blue")
            .default_value("32")
            .value_parser(value_parser!(u8))
    }

    fn create_alpha_increment_argument() -> Arg {
        arg!(alpha_increment: -a --alpha_increment <VALUE> "Value added to alpha")
            .default_value("0")
            .value_parser(value_parser!(u8))
    }

    fn create_add_method_argument() -> Arg {
        arg!(add_method: -m --method <METHOD> "Saturating add implementation")
            .default_value("Auto")
            .value_parser(value_parser!(AddMethod))
    }

    fn create_flip_vertically_argument() -> Arg {
        arg!(flip_vertically: -f --flip_vertically "Flip rows after loading, restored when saving")
            .action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            increment: Self::extract_increment_argument(matches),
            alpha_increment: Self::extract_alpha_increment_argument(matches),
            add_method: Self::extract_add_method_argument(matches),
            flip_vertically: Self::extract_flip_vertically_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Input file has a default, but was unset")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Output file has a default, but was unset")
            .clone()
    }

    fn extract_increment_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("increment")
            .expect("Increment must be provided, but was unset.")
            .to_owned()
    }

    fn extract_alpha_increment_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("alpha_increment")
            .expect("Alpha increment must be provided, but was unset.")
            .to_owned()
    }

    fn extract_add_method_argument(matches: &ArgMatches) -> AddMethod {
        matches
            .get_one::<AddMethod>("add_method")
            .expect("Add method must be provided, but was unset.")
            .to_owned()
    }

    fn extract_flip_vertically_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("flip_vertically")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::{AddMethod, CLIParser};

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_input_file_argument() {
        let input_file_name = "testfile.png";
        let command = Command::new("test");
        let command = CLIParser::register_input_file_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, input_file_name]);
        let input_file = CLIParser::extract_input_file_argument(&matches);
        assert_eq!(input_file.file_name().unwrap(), input_file_name);
    }

    #[test]
    fn parse_increment_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_increment_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--increment", "64"]);
        let increment = CLIParser::extract_increment_argument(&matches);
        assert_eq!(increment, 64);
    }

    #[test]
    fn parse_increment_out_of_range() {
        let command = Command::new("test");
        let command = CLIParser::register_increment_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-i", "256"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Increment above 255 not detected");
        }
    }

    #[test]
    fn parse_add_method_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_add_method_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--method", "Scalar"]);
        let actual = CLIParser::extract_add_method_argument(&matches);
        assert_eq!(actual, AddMethod::Scalar);
    }

    #[test]
    fn parse_add_method_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_add_method_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-m", "Gpu"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::InvalidValue);
        } else {
            panic!("Illegal value for method not detected");
        }
    }

    #[test]
    fn parse_flip_vertically_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_flip_vertically_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-f"]);
        assert!(CLIParser::extract_flip_vertically_argument(&matches));
    }

    #[test]
    fn parse_defaults_only() {
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![PROGRAM_NAME_ARGUMENT]);
        assert_eq!(
            arguments.input_file.to_str().unwrap(),
            "pillars.png",
            "input file does not match"
        );
        assert_eq!(
            arguments.output_file.to_str().unwrap(),
            "output.png",
            "output file does not match"
        );
        assert_eq!(arguments.increment, 32, "increment does not match");
        assert_eq!(arguments.alpha_increment, 0, "alpha increment does not match");
        assert_eq!(arguments.add_method, AddMethod::Auto, "add method does not match");
        assert!(!arguments.flip_vertically, "flip flag does not match");
        assert_eq!(arguments.increments(), [32, 32, 32, 0]);
    }

    #[test]
    fn parse_all_arguments() {
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![
            PROGRAM_NAME_ARGUMENT,
            "/input_directory/in.png",
            "/output_directory/out.bmp",
            "-i",
            "10",
            "-a",
            "5",
            "-m",
            "Vectorized",
            "--flip_vertically",
        ]);
        assert_eq!(arguments.output_file.file_name().unwrap(), "out.bmp");
        assert_eq!(arguments.increments(), [10, 10, 10, 5]);
        assert_eq!(arguments.add_method, AddMethod::Vectorized);
        assert!(arguments.flip_vertically);
    }
}
