use crate::config::MigrateConfig;
use crate::library::load_template_library;
use crate::support::{EXIT_FAILURE, EXIT_USAGE, exit_with, validate_input_path, write_output};
use flavor_migrate_kernel::convert_flavor_part;
use flavor_migrate_schema::render_flavor_collection;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct Args {
    pub input: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_write: bool,
    pub quiet: bool,
}

pub fn run(args: Args) {
    let config = MigrateConfig::resolve(args.config.as_deref(), args.template_dir, args.output)
        .unwrap_or_else(|e| exit_with(EXIT_FAILURE, e));

    validate_input_path(&args.input).unwrap_or_else(|e| exit_with(EXIT_USAGE, e));

    let legacy = fs::read(&args.input).unwrap_or_else(|e| {
        exit_with(
            EXIT_FAILURE,
            format!("failed to read {}: {e}", args.input.display()),
        )
    });

    let library = load_template_library(&config.template_dir)
        .unwrap_or_else(|e| exit_with(EXIT_FAILURE, e));

    let conversion = convert_flavor_part(&legacy, library).unwrap_or_else(|e| {
        exit_with(
            EXIT_FAILURE,
            format!("failed to convert {}: {e}", args.input.display()),
        )
    });
    info!(
        input = %args.input.display(),
        flavors = conversion.flavors.len(),
        templates = conversion.templates.len(),
        "flavor part converted"
    );

    let rendered = render_flavor_collection(&conversion.flavors)
        .unwrap_or_else(|e| exit_with(EXIT_FAILURE, e));

    if !args.quiet {
        println!("{rendered}");
    }

    if !args.no_write {
        write_output(&config.output_path, &rendered)
            .unwrap_or_else(|e| exit_with(EXIT_FAILURE, e));
        info!(output = %config.output_path.display(), "converted flavor part written");
    }
}
