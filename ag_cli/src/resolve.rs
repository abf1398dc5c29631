//! The resolve pipeline: acquire, parse, build, order, present.

use console::style;
use serde_json::json;

use ag_core::{
    Error, GraphBuilder, Resolution, install_order, parse_package_index, parse_test_graph,
    render_dot,
};
use ag_io::{Fetcher, RenderOutcome, render_image, write_dot};

use crate::display;
use crate::{Cli, Mode, local_repo_path};

pub async fn run(cli: Cli) -> Result<(), Error> {
    let fetcher = Fetcher::new();
    let text = acquire(&fetcher, &cli).await?;

    let mut builder = GraphBuilder::new();
    if let Some(filter) = &cli.filter {
        builder = builder.with_filter(filter);
    }

    let (resolution, pinned_version) = match cli.mode {
        Mode::Test => {
            let graph = parse_test_graph(&text);
            let root = cli.package.to_uppercase();
            graph.require(&root)?;
            (builder.build(&root, &graph), None)
        }
        Mode::Download | Mode::Clone | Mode::Local => {
            let index = parse_package_index(&text);
            if index.skipped() > 0 {
                display::note_skipped(index.skipped());
            }
            let version = index
                .lookup(&cli.package, cli.package_version.as_deref())?
                .version
                .clone();
            (builder.build(&cli.package, &index), Some(version))
        }
    };

    let order = cli
        .install_order
        .then(|| install_order(&resolution.graph, &resolution.root, cli.filter.as_deref()));

    if cli.json {
        print_json(&resolution, order.as_deref())?;
    } else {
        print_report(&cli, &resolution, pinned_version.as_deref(), order.as_deref());
    }

    if cli.visualize || cli.open {
        visualize(&cli, &resolution)?;
    }

    Ok(())
}

async fn acquire(fetcher: &Fetcher, cli: &Cli) -> Result<String, Error> {
    match cli.mode {
        Mode::Test | Mode::Local => fetcher.fetch_file(&local_repo_path(&cli.repo)).await,
        Mode::Download => {
            let spinner = display::fetch_spinner("downloading package index...");
            let result = fetcher.fetch_url(&cli.repo).await;
            spinner.finish_and_clear();
            result
        }
        Mode::Clone => {
            let spinner = display::fetch_spinner("cloning repository...");
            let result = fetcher.fetch_clone(&cli.repo).await;
            spinner.finish_and_clear();
            result
        }
    }
}

fn print_report(
    cli: &Cli,
    resolution: &Resolution,
    pinned_version: Option<&str>,
    order: Option<&[String]>,
) {
    println!(
        "{}",
        display::format_header(&resolution.root, pinned_version)
    );
    println!();
    display::print_tree(resolution);
    println!();
    println!(
        "{}",
        display::format_summary(resolution.node_count(), resolution.edge_count())
    );

    if let (Some(filter), false) = (&cli.filter, resolution.filtered.is_empty()) {
        println!(
            "{}",
            display::format_filtered_note(resolution.filtered.len(), filter)
        );
    }

    display::print_cycles(resolution);

    if let Some(order) = order {
        display::print_install_order(order);
    }
}

fn print_json(resolution: &Resolution, order: Option<&[String]>) -> Result<(), Error> {
    let doc = json!({
        "root": resolution.root,
        "graph": resolution.graph,
        "cycles": resolution.cycles,
        "filtered": resolution.filtered,
        "install_order": order,
    });
    let rendered = serde_json::to_string_pretty(&doc).map_err(|e| Error::RenderFailure {
        message: format!("json: {e}"),
    })?;
    println!("{rendered}");
    Ok(())
}

fn visualize(cli: &Cli, resolution: &Resolution) -> Result<(), Error> {
    let dot = render_dot(resolution);
    let dot_path = write_dot(&cli.output, &resolution.root, &dot)?;

    match render_image(&dot_path)? {
        RenderOutcome::Image(image) => {
            println!(
                "{} Rendered graph to {}",
                style("==>").cyan().bold(),
                style(image.display()).bold()
            );
            if cli.open && !ag_io::open_viewer(&image) {
                eprintln!(
                    "    {}",
                    style("could not start an image viewer; open the file manually").dim()
                );
            }
        }
        RenderOutcome::DotOnly(path) => {
            println!(
                "{} Graphviz 'dot' not found; wrote {} instead",
                style("==>").cyan().bold(),
                style(path.display()).bold()
            );
        }
    }

    Ok(())
}
