use clap::Parser;

use buildmeta::config::{Cli, Command};
use buildmeta::{
    AmbientContext, GenerationRequest, JsonBuildGraph, LogFormat, init_logging, run_configure,
    run_generate,
};

fn main() -> anyhow::Result<()> {
    init_logging(LogFormat::from_env())?;

    let cli = Cli::parse();
    match cli.command {
        Command::Configure(args) => {
            let ctx = AmbientContext::resolve(&args.context)?;
            let plan_path = args
                .plan
                .clone()
                .unwrap_or_else(|| args.gen_dir.join("plan.json"));
            let mut graph = JsonBuildGraph::open(&plan_path)?;

            let request = GenerationRequest {
                name: args.name,
                link_targets: args.link_targets,
                namespace: args.namespace,
                language: args.language,
                worktree: args.worktree,
                project_name: args.project_name,
                project_version: args.project_version,
                extra_args: args.extra,
            };

            run_configure(request, &ctx, &args.gen_dir, &mut graph)?;
            graph.save()?;
        }
        Command::Generate(args) => {
            run_generate(&args.params)?;
        }
    }
    Ok(())
}
