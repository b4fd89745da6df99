use anyhow::Result;
use argp::FromArgs;
use required_approvals_core::policy::evaluate;
use typed_path::Utf8NativePathBuf;

use crate::{cmd::load_requirements, util::native_path};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Validate requirements, optionally evaluating them against a list of changed files.
#[argp(subcommand, name = "validate")]
pub struct Args {
    #[argp(option, short = 'r')]
    /// requirements YAML (default: $INPUT_REQUIREMENTS)
    requirements: Option<String>,
    #[argp(option, short = 'f', from_str_fn(native_path))]
    /// read requirements YAML from a file
    requirements_file: Option<Utf8NativePathBuf>,
    #[argp(option)]
    /// a changed file to evaluate against (repeatable)
    file: Vec<String>,
    #[argp(option, default = "0")]
    /// number of approvals to assume when evaluating
    approvals: u32,
}

pub fn run(args: Args) -> Result<()> {
    let requirements = load_requirements(args.requirements, args.requirements_file.as_ref())?;
    println!("{} requirements", requirements.len());
    for requirement in &requirements {
        println!(
            "- {} approvals: {}",
            requirement.required_approvals,
            requirement.patterns.join(", ")
        );
    }
    if args.file.is_empty() {
        return Ok(());
    }

    let evaluation = evaluate(&requirements, &args.file, args.approvals);
    println!();
    for result in &evaluation.results {
        let status = match (result.triggered, result.satisfied) {
            (false, _) => "not triggered",
            (true, true) => "met",
            (true, false) => "not met",
        };
        println!(
            "{} ({}): {status}",
            result.requirement.patterns.join(", "),
            result.approvals_required
        );
    }
    for line in evaluation.unmet_messages() {
        println!("{line}");
    }
    println!("{}", evaluation.approvals_title());
    Ok(())
}
