//! wpscaffold's entry point.
//! Parses arguments, loads the template configuration and runs one generation.

use indexmap::IndexMap;
use wpscaffold::{
    answers::{load_from_stdin, AnswerMode},
    cli::{get_args, Args},
    config::load_config,
    error::{default_error_handler, Result},
    logger::init_logger,
    pipeline::{GenerateOptions, Generator},
    prompt::DialoguerPrompter,
    renderer::MiniJinjaRenderer,
};

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let prompter = DialoguerPrompter::new();

    let config = load_config(&args.template, args.config.as_deref())?;
    println!("Using template '{}' from '{}'", config.name, args.template.display());

    // stdin is consumed by the answers, so nothing is left to prompt with
    let (preloaded, mode) = if args.stdin {
        (load_from_stdin()?, AnswerMode::Defaults)
    } else if args.defaults {
        (IndexMap::new(), AnswerMode::Defaults)
    } else {
        (IndexMap::new(), AnswerMode::Interactive)
    };

    let options = GenerateOptions { mode, preloaded, dry_run: args.dry_run };
    let mut generator =
        Generator::new(&config, &args.template, &args.output_dir, &prompter, &renderer);
    let outcome = generator.run(options)?;

    let action = if args.dry_run { "Would create" } else { "Created" };
    for target in outcome.targets() {
        println!("{action}: '{}'", args.output_dir.join(target).display());
    }

    if args.dry_run {
        println!("Dry run finished, {} files planned.", outcome.files.len());
    } else {
        println!("Plugin generated successfully in {}.", args.output_dir.display());
    }
    Ok(())
}
