// FILE: src/cli/handlers.rs
use crate::{
    cli::OutputFormat,
    generate_plan_file, ConvertError, ConvertOptions, CoordinateResolver, HierarchyBuilder, LayerManifest,
    ManifestFormat, PanelTree, Result,
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;

// --- GENERATE ---
pub fn handle_generate_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches.get_one::<String>("input").unwrap();
    let output_path = matches
        .get_one::<String>("output")
        .map(|s| s.to_string())
        .unwrap_or_else(|| default_output_path(input_path, cli.output_directory()));

    let options = cli.build_convert_options(matches)?;

    if matches.get_flag("watch") {
        watch_and_generate(input_path, &output_path, options)
    } else {
        generate_single_file(input_path, &output_path, &options, matches.get_flag("stats"))
    }
}

fn default_output_path(input_path: &str, output_directory: Option<&str>) -> String {
    let input = Path::new(input_path);
    let file_name = input.with_extension("plan.json");
    match (output_directory, file_name.file_name()) {
        (Some(dir), Some(name)) => Path::new(dir).join(name).to_string_lossy().into_owned(),
        _ => file_name.to_string_lossy().into_owned(),
    }
}

fn generate_single_file(input_path: &str, output_path: &str, options: &ConvertOptions, show_stats: bool) -> Result<()> {
    println!("🔨 Generating {} -> {}", input_path, output_path);

    let start = Instant::now();
    let stats = generate_plan_file(input_path, output_path, options)?;

    println!("✅ Generation successful!");
    println!("   Widgets: {}", stats.widget_count);
    println!("   Output: {} bytes", stats.output_size);
    println!("   Time: {:.2}ms", start.elapsed().as_millis());

    if stats.unparsed_count > 0 {
        println!("   ⚠️  {} layer names did not parse", stats.unparsed_count);
    }

    if show_stats {
        print_detailed_stats(&stats);
    }

    Ok(())
}

fn watch_and_generate(input_path: &str, output_path: &str, options: ConvertOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        ConvertError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher
        .watch(Path::new(input_path), RecursiveMode::NonRecursive)
        .map_err(|e| {
            ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch file: {}", e),
            ))
        })?;

    if let Err(e) = generate_plan_file(input_path, output_path, &options) {
        eprintln!("❌ Initial generation failed: {}", e);
    } else {
        println!("✅ Initial generation successful");
    }

    loop {
        match rx.recv() {
            Ok(_event) => {
                println!("🔄 Manifest changed, regenerating...");
                match generate_plan_file(input_path, output_path, &options) {
                    Ok(stats) => {
                        println!(
                            "✅ Regenerated successfully ({} widgets, {}ms)",
                            stats.widget_count, stats.generate_time_ms
                        );
                    }
                    Err(e) => eprintln!("❌ Generation failed: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(_cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches.get_one::<String>("input").unwrap();
    let recursive = matches.get_flag("recursive");

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path)
    } else {
        check_single_file(input_path).map(|_| ())
    }
}

/// Returns the number of unparsed layer names
fn check_single_file(input_path: &str) -> Result<usize> {
    println!("🔍 Checking {}", input_path);

    let result = LayerManifest::load(input_path).and_then(|manifest| HierarchyBuilder::new().build(&manifest.layers));
    match result {
        Ok(tree) => {
            let unparsed: Vec<&str> = tree
                .iter()
                .filter(|(_, node)| node.element.is_none() && !node.is_control_info() && !node.is_section_divider())
                .map(|(_, node)| node.control_name.as_str())
                .collect();
            if unparsed.is_empty() {
                println!("✅ {} - No issues found", input_path);
            } else {
                println!("⚠️  {} - {} unannotated layers:", input_path, unparsed.len());
                for name in &unparsed {
                    println!("     {}", name);
                }
            }
            Ok(unparsed.len())
        }
        Err(e) => {
            println!("❌ {} - {}", input_path, e);
            Err(e)
        }
    }
}

fn check_directory_recursive(dir_path: &str) -> Result<()> {
    let mut total_files = 0;
    let mut error_files = 0;

    for entry in walkdir::WalkDir::new(dir_path) {
        let entry = entry.map_err(|e| {
            ConvertError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Directory traversal error: {}", e),
            ))
        })?;
        if entry.file_type().is_file() && ManifestFormat::from_path(entry.path()).is_some() {
            total_files += 1;
            if check_single_file(&entry.path().to_string_lossy()).is_err() {
                error_files += 1;
            }
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total manifests: {}", total_files);
    println!("   Manifests with errors: {}", error_files);
    if total_files > 0 {
        println!(
            "   Success rate: {:.1}%",
            (total_files - error_files) as f64 / total_files as f64 * 100.0
        );
    }

    if error_files > 0 {
        Err(ConvertError::invalid_format(format!("{} manifests have errors", error_files)))
    } else {
        Ok(())
    }
}

// --- TREE ---
#[derive(Debug, Serialize)]
struct TreeEntry {
    name: String,
    control_type: String,
    layer: crate::LayerId,
    control_info: bool,
    position: glam::Vec2,
    size: glam::Vec2,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeEntry>,
}

pub fn handle_tree_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = matches.get_one::<String>("input").unwrap();
    let format = matches.get_one::<OutputFormat>("format").unwrap();

    let manifest = LayerManifest::load(input_path)?;
    let mut options = cli.build_convert_options(matches)?;
    options.canvas = options.resolve_canvas(manifest.canvas);

    let tree = HierarchyBuilder::new().build(&manifest.layers)?;
    let resolver = CoordinateResolver::new(&tree, options.canvas);

    match format {
        OutputFormat::Json => {
            let entries: Vec<TreeEntry> = tree.roots().iter().map(|&root| tree_entry(&tree, &resolver, root)).collect();
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| ConvertError::serialization(format!("Tree: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("🌳 {} ({} layers, canvas {}x{})", input_path, tree.len(), options.canvas.x, options.canvas.y);
            for &root in tree.roots() {
                tree.traverse(root, &mut |id, depth| {
                    let node = tree.node(id);
                    let marker = if node.is_control_info() { " [ControlInfo]" } else { "" };
                    let position = resolver.position(id);
                    let size = resolver.size(id);
                    println!(
                        "{}- {} @{}{} pos=({}, {}) size=({}, {})",
                        "  ".repeat(depth),
                        node.control_name,
                        if node.control_type.is_empty() { "?" } else { node.control_type.as_str() },
                        marker,
                        position.x,
                        position.y,
                        size.x,
                        size.y
                    );
                });
            }
        }
    }

    Ok(())
}

fn tree_entry(tree: &PanelTree, resolver: &CoordinateResolver<'_>, id: crate::NodeId) -> TreeEntry {
    let node = tree.node(id);
    TreeEntry {
        name: node.control_name.clone(),
        control_type: node.control_type.clone(),
        layer: node.layer,
        control_info: node.is_control_info(),
        position: resolver.position(id),
        size: resolver.size(id),
        children: tree.children(id).iter().map(|&child| tree_entry(tree, resolver, child)).collect(),
    }
}

// --- HELPERS ---
fn print_detailed_stats(stats: &crate::GenerationStats) {
    println!("\n📊 Detailed Generation Statistics:");
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Generation time: {}ms", stats.generate_time_ms);
    println!("\n   Layer breakdown:");
    println!("     Layers: {}", stats.layer_count);
    println!("     Roots: {}", stats.root_count);
    println!("     Parsed names: {}", stats.parsed_count);
    println!("     Unparsed names: {}", stats.unparsed_count);
    println!("     ControlInfo layers: {}", stats.control_info_count);
    println!("\n   Plan breakdown:");
    println!("     Widgets: {}", stats.widget_count);
    println!("     Skipped nodes: {}", stats.skipped_count);
    println!("     Texture layers: {}", stats.texture_count);
}
