use clap::{Parser, Subcommand};

use tc_cli::commands::config_ops::{self, DefaultFile};
use tc_cli::commands::mazegaki_ops::{self, LookupOptions};
use tc_cli::commands::{bushu_ops, single_char};
use tc_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "tctool", about = "T-Code composition table tool")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Settings TOML to use instead of the embedded defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose two characters with a Bushu table
    Bushu {
        /// Bushu table file
        table: String,
        /// First character
        #[arg(value_parser = single_char)]
        a: char,
        /// Second character
        #[arg(value_parser = single_char)]
        b: char,
    },
    /// Show the parts a character decomposes into
    Decompose {
        /// Bushu table file
        table: String,
        /// Character to decompose
        #[arg(value_parser = single_char)]
        c: char,
    },
    /// List Mazegaki hits for the tail of a reading
    Mazegaki {
        /// Mazegaki dictionary (text or compiled)
        dict_file: String,
        /// Reading to convert
        reading: String,
        /// Only try the whole reading
        #[arg(long)]
        fixed: bool,
        /// Also try inflected keys
        #[arg(long)]
        inflection: bool,
        /// Longest okurigana to cut off (default: from settings)
        #[arg(long)]
        max_offset: Option<usize>,
        /// Learned-preference file to apply
        #[arg(long)]
        lru: Option<String>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Compile a text Mazegaki dictionary into a snapshot
    Compile {
        /// Input text dictionary
        input_file: String,
        /// Output file
        output_file: String,
    },
    /// Show Mazegaki dictionary info
    Info {
        /// Dictionary file (text or compiled)
        file: String,
    },
    /// Validate a keymap TOML file
    CheckKeymap {
        /// Path to the TOML file
        file: String,
    },
    /// Validate a settings TOML file
    CheckSettings {
        /// Path to the TOML file
        file: String,
    },
    /// Print an embedded default file
    DumpDefaults {
        #[arg(value_enum, default_value = "settings")]
        which: DefaultFile,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(file) = &cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::Bushu { table, a, b } => bushu_ops::compose(&table, a, b),
        Command::Decompose { table, c } => bushu_ops::decompose(&table, c),
        Command::Mazegaki {
            dict_file,
            reading,
            fixed,
            inflection,
            max_offset,
            lru,
            json,
        } => {
            let opts = LookupOptions {
                fixed,
                inflection,
                max_offset,
                lru: lru.as_deref(),
                json,
            };
            mazegaki_ops::lookup(&dict_file, &reading, &opts);
        }
        Command::Compile {
            input_file,
            output_file,
        } => mazegaki_ops::compile(&input_file, &output_file),
        Command::Info { file } => mazegaki_ops::info(&file),
        Command::CheckKeymap { file } => config_ops::check_keymap(&file),
        Command::CheckSettings { file } => config_ops::check_settings(&file),
        Command::DumpDefaults { which } => config_ops::dump_defaults(which),
    }
}
