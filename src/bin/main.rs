//! SPM Export CLI
//!
//! Convert JSON scene descriptions into SPM model files.

use clap::{Parser, Subcommand};
use spm_export::{
    export_scene, load_scene, BakedPoseEvaluator, ExportConfig, FrameEvaluator, Scene,
    WEIGHT_EPSILON,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spm-export")]
#[command(author, version, about = "Convert scene meshes into SPM model files", long_about = None)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export mesh objects of a scene to SPM files
    Export {
        /// Input JSON scene description
        #[arg(short, long)]
        scene: PathBuf,

        /// Output file path (with --all, the base name for per-object files)
        #[arg(short, long)]
        output: PathBuf,

        /// Export every mesh object instead of the first selected one
        #[arg(long)]
        all: bool,

        /// Do not write skeletal animation
        #[arg(long)]
        no_skeleton: bool,

        /// Skin weights at or below this value are dropped
        #[arg(long, default_value_t = WEIGHT_EPSILON)]
        weight_epsilon: f32,
    },

    /// Show information about a scene
    Info {
        /// Input JSON scene description
        #[arg(short, long)]
        scene: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Export {
            scene,
            output,
            all,
            no_skeleton,
            weight_epsilon,
        } => {
            let mut config = ExportConfig::default()
                .with_skeleton(!no_skeleton)
                .with_weight_epsilon(weight_epsilon);
            if all {
                config = config.all_objects();
            }
            run_export(&scene, &output, &config)
        }
        Commands::Info { scene } => show_scene_info(&scene),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "spm_export=debug" } else { "spm_export=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_export(
    scene_path: &Path,
    output_path: &Path,
    config: &ExportConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let scene = load_scene(scene_path)?;
    println!(
        "  Found {} mesh objects, {} armatures",
        scene.mesh_objects().count(),
        scene.armatures.len()
    );

    let mut evaluator = BakedPoseEvaluator::new(scene.current_frame);
    let report = export_scene(&scene, &mut evaluator, output_path, config);
    debug_assert_eq!(evaluator.current_frame(), scene.current_frame);

    for (name, path) in &report.exported {
        println!("Exported '{}' to {:?}", name, path);
    }
    for (name, error) in &report.failed {
        eprintln!("Failed '{}': {}", name, error);
    }
    if report.exported.is_empty() && report.failed.is_empty() {
        println!("Nothing to export");
    }

    Ok(report.is_success())
}

fn show_scene_info(scene_path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let scene = load_scene(scene_path)?;
    print_scene(&scene);
    Ok(true)
}

fn print_scene(scene: &Scene) {
    println!("\nScene Info:");
    println!("  Current frame: {}", scene.current_frame);
    println!("  Objects: {}", scene.objects.len());
    for object in &scene.objects {
        match &object.mesh {
            Some(mesh) => println!(
                "    {}{}: {} vertices, {} faces, {} UV layers{}",
                object.name,
                if object.selected { " (selected)" } else { "" },
                mesh.vertices.len(),
                mesh.faces.len(),
                object.uv_layers.len(),
                object
                    .armature
                    .as_ref()
                    .map(|a| format!(", armature '{}'", a))
                    .unwrap_or_default()
            ),
            None => println!("    {}: no mesh", object.name),
        }
    }
    println!("  Armatures: {}", scene.armatures.len());
    for armature in &scene.armatures {
        let frames = armature
            .action
            .as_ref()
            .map(|a| format!("'{}' frames {}..={}", a.name, a.frame_start, a.frame_end))
            .unwrap_or_else(|| "no action".to_string());
        println!(
            "    {}: {} bones, {}",
            armature.name,
            armature.bones.len(),
            frames
        );
    }
}
