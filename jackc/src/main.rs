use clap::Parser;
use color_print::cformat;
use jackc::{tokens_xml, Compiler};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input files, one class each
    #[clap(required = true)]
    input: Vec<String>,

    /// Print the token listing instead of VM code
    #[clap(short, long)]
    tokens: bool,

    /// Print progress and an annotated listing to stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let mut compiler = Compiler::new();

    for (idx, path) in args.input.iter().enumerate() {
        if args.verbose {
            eprintln!("{}", cformat!("<s>{}.</> Compile {}", idx + 1, path));
        }

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("{}", cformat!("<r,s>Failed to read file</>: {}: {}", path, err));
                std::process::exit(1);
            }
        };

        let result = if args.tokens {
            tokens_xml(path, &source)
        } else {
            compiler.compile(path, &source).map(|code| {
                if args.verbose {
                    eprint!("{}", code.cformat());
                }
                code.to_string()
            })
        };

        match result {
            Ok(out) => print!("{}", out),
            Err(err) => {
                err.print_diag(&source);
                std::process::exit(1);
            }
        }
    }
}
