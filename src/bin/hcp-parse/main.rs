use std::fs;

use anyhow::{bail, Context};
use hcp_parser::{
    ast::{Composite, ItemKind},
    grammar::{grammar, Grammar},
    parse_with, Cursor, Options,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: hcp-parse [--trace] [--no-cache] [--partial] [--tree] [--rule NAME] FILE...";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = pico_args::Arguments::from_env();

    let trace = args.contains("--trace");
    let no_cache = args.contains("--no-cache");
    let partial = args.contains("--partial");
    let tree = args.contains("--tree");
    let rule_name = args
        .opt_value_from_str::<_, String>("--rule")?
        .unwrap_or_else(|| "file".to_owned());

    let rule = match grammar().rule(&rule_name) {
        Some(it) => it,
        None => bail!(
            "no rule called {:?}, try one of: {}",
            rule_name,
            Grammar::RULE_NAMES.join(", ")
        ),
    };

    let root = std::env::current_dir()?;

    let mut had_any_files = false;
    let mut failures = 0;
    while let Some(path_stub) = args.opt_free_from_str::<String>()? {
        let path = root.join(path_stub);
        let source = fs::read_to_string(&path)
            .with_context(|| format!("couldn't read {}", path.display()))?;
        let name = path.to_string_lossy().into_owned();
        had_any_files = true;

        let options = Options::new()
            .trace(trace)
            .cache(!no_cache)
            .partial_at_end(partial);
        let mut root_item = Composite::new(ItemKind::File);
        match parse_with(&mut root_item, Cursor::from(source.as_str()), rule, options) {
            Ok(end) => {
                if tree {
                    for node in &root_item.children {
                        print!("{}", node.dump());
                    }
                }
                if end.at_end() {
                    println!("{}: parsed as {}", name, rule);
                } else {
                    println!("{}: parsed as {} up to {}", name, rule, end);
                }
            }
            Err(ono) => {
                failures += 1;
                ono.report(name.clone())
                    .eprint(ariadne::sources(std::iter::once((name, &source))))?;
                if tree && !ono.partial.is_empty() {
                    eprintln!("matched before running out of input:");
                    for span in &ono.partial {
                        eprintln!("  {:?}", String::from_utf8_lossy(&source.as_bytes()[span.clone()]));
                    }
                }
            }
        }
    }

    if !had_any_files {
        bail!(USAGE);
    }
    if failures > 0 {
        bail!("{} file(s) failed to parse", failures);
    }

    Ok(())
}
