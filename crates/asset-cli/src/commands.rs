use anyhow::{bail, Context};
use asset_codec::Binaries;
use asset_store::{AssetStore, LocalBackend, StoreConfig};
use asset_tree::{export_buffer, import_buffer, Property, PropertyId, PropertyTree};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    debug!(root = %config.root.display(), digest = %config.digest, "opened store");
    let store = AssetStore::open(&config);
    match cli.command {
        Command::Show(args) => cmd_show(&store, args),
        Command::Verify(args) => cmd_verify(&store, args),
        Command::ImportBuffer(args) => cmd_import_buffer(&store, args),
        Command::ExportBuffer(args) => cmd_export_buffer(&store, args),
        Command::List => cmd_list(&store),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    Ok(config)
}

fn cmd_show(store: &AssetStore<LocalBackend>, args: ShowArgs) -> anyhow::Result<()> {
    let decoded = store
        .load_decoded(&args.alias)
        .with_context(|| format!("loading {}", args.alias))?;
    let root = decoded.tree.require_root()?;
    println!(
        "{} ({} nodes, {} side files)",
        args.alias.bold(),
        decoded.tree.len(),
        decoded.binaries.len()
    );
    for line in outline(&decoded.tree, root, &decoded.binaries)? {
        println!("{line}");
    }
    Ok(())
}

/// One line per node, children indented under their parent.
fn outline(
    tree: &PropertyTree,
    root: PropertyId,
    binaries: &Binaries,
) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    outline_node(tree, root, binaries, None, 0, &mut lines)?;
    Ok(lines)
}

fn outline_node(
    tree: &PropertyTree,
    id: PropertyId,
    binaries: &Binaries,
    label: Option<String>,
    indent: usize,
    lines: &mut Vec<String>,
) -> anyhow::Result<()> {
    let node = tree.get(id)?;
    let prefix = match &label {
        Some(label) => format!("{}{}: ", "  ".repeat(indent), label.bold()),
        None => "  ".repeat(indent),
    };
    let kind = node.kind().to_string().cyan();
    let summary = match node {
        Property::Undefined => String::new(),
        Property::Bool(v) => v.to_string(),
        Property::Sint(v) => v.to_string(),
        Property::Uint(v) => v.to_string(),
        Property::Real(v) => v.to_string(),
        Property::String(v) => format!("{v:?}"),
        Property::Object(items) => format!("{{{}}}", items.len()),
        Property::Array(items) => format!("[{}]", items.len()),
        Property::Raw(raw) => {
            let token = binaries
                .get(&id)
                .map(|t| t.to_string())
                .unwrap_or_default();
            format!("{} bytes {}", raw.capacity(), token.dimmed())
        }
    };
    lines.push(format!("{prefix}{kind} {summary}").trim_end().to_string());

    match node {
        Property::Object(items) => {
            for (key, child) in items {
                outline_node(tree, *child, binaries, Some(key.clone()), indent + 1, lines)?;
            }
        }
        Property::Array(items) => {
            for (index, slot) in items.iter().enumerate() {
                let label = Some(index.to_string());
                match slot {
                    Some(child) => outline_node(tree, *child, binaries, label, indent + 1, lines)?,
                    None => lines.push(format!(
                        "{}{}: {}",
                        "  ".repeat(indent + 1),
                        index,
                        "empty".dimmed()
                    )),
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn cmd_verify(store: &AssetStore<LocalBackend>, args: VerifyArgs) -> anyhow::Result<()> {
    let report = store
        .verify(&args.alias)
        .with_context(|| format!("verifying {}", args.alias))?;
    for token in &report.missing {
        println!("  {} {}", "missing:".red(), token);
    }
    for failure in &report.mismatched {
        println!(
            "  {} {} (computed {})",
            "mismatch:".red(),
            failure.token,
            failure.computed.to_string().dimmed()
        );
    }
    if !report.is_clean() {
        bail!(
            "{}: {} missing, {} mismatched of {} side files",
            args.alias,
            report.missing.len(),
            report.mismatched.len(),
            report.checked
        );
    }
    println!(
        "{} {}: {} side files verified ({})",
        "✓".green().bold(),
        args.alias.bold(),
        report.checked,
        store.hasher().kind()
    );
    Ok(())
}

fn cmd_import_buffer(
    store: &AssetStore<LocalBackend>,
    args: ImportBufferArgs,
) -> anyhow::Result<()> {
    let mut tree = PropertyTree::new();
    let root = import_buffer(&mut tree, &args.files, args.stride)?;
    tree.set_root(root)?;
    let report = store.save(&args.alias, &tree)?;
    println!(
        "{} Stored {} ({} written, {} reused)",
        "✓".green().bold(),
        args.alias.bold(),
        report.written.len(),
        report.skipped.len()
    );
    for token in report.binaries.values() {
        println!("  {}", token.file_name(&args.alias).dimmed());
    }
    Ok(())
}

fn cmd_export_buffer(
    store: &AssetStore<LocalBackend>,
    args: ExportBufferArgs,
) -> anyhow::Result<()> {
    let tree = store.load(&args.alias)?;
    let id = tree.lookup(tree.require_root()?, &args.path)?;
    export_buffer(&tree, id, &args.out)
        .with_context(|| format!("exporting to {}", args.out.display()))?;
    println!(
        "{} Wrote {}",
        "✓".green().bold(),
        args.out.display().to_string().bold()
    );
    Ok(())
}

fn cmd_list(store: &AssetStore<LocalBackend>) -> anyhow::Result<()> {
    let aliases = store.list()?;
    if aliases.is_empty() {
        println!("No stored trees.");
    }
    for alias in aliases {
        println!("{alias}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cli(root: PathBuf, command: Command) -> Cli {
        Cli {
            command,
            root: Some(root),
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn outline_lists_keys_and_tokens() {
        colored::control::set_override(false);
        let mut tree = PropertyTree::new();
        let root = tree.create_object();
        let count = tree.create_uint(3);
        let data = tree.create_raw_from(&[1, 2, 3, 4]);
        tree.set_object_item(root, "count", count).unwrap();
        tree.set_object_item(root, "data", data).unwrap();

        let token = asset_types::BinaryToken::from_digest([0xAB; 16]);
        let mut binaries = Binaries::new();
        binaries.insert(data, token);

        let lines = outline(&tree, root, &binaries).unwrap();
        assert_eq!(
            lines,
            vec![
                "object {2}".to_string(),
                "  count: uint 3".to_string(),
                format!("  data: raw 4 bytes {token}"),
            ]
        );
    }

    #[test]
    fn import_then_export_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let output = dir.path().join("out.bin");
        std::fs::write(&input, [1u8, 2, 3, 4, 5, 6]).unwrap();
        let store_root = dir.path().join("store");

        run_command(cli(
            store_root.clone(),
            Command::ImportBuffer(ImportBufferArgs {
                alias: "verts".into(),
                stride: 3,
                files: vec![input],
            }),
        ))
        .unwrap();
        run_command(cli(
            store_root.clone(),
            Command::Verify(VerifyArgs {
                alias: "verts".into(),
            }),
        ))
        .unwrap();
        run_command(cli(
            store_root,
            Command::ExportBuffer(ExportBufferArgs {
                alias: "verts".into(),
                out: output.clone(),
                path: String::new(),
            }),
        ))
        .unwrap();

        assert_eq!(std::fs::read(output).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn verify_fails_on_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command(cli(
            dir.path().to_path_buf(),
            Command::Verify(VerifyArgs { alias: "absent".into() }),
        ));
        assert!(result.is_err());
    }
}
