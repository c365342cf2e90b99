#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("mesh_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bezier_engine::geom::{BezierSurface, DerivativeBoundary, SurfaceOptions};
    use std::fs::{self, File};
    use std::io::BufWriter;
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"mesh_cli (bezier-engine)

USAGE:
  mesh_cli <heights-file> [options]

OPTIONS:
  --samples <n>        Samples per patch edge (default 10, minimum 2)
  --spacing <m>        Spacing multiplier for the control grid (default 1.0)
  --boundary <mode>    Derivative boundary handling: analytic | legacy | strict
  --derivative-normals Also evaluate patch-derivative normals and report their range
  --obj <path>         Write the tessellated surface as OBJ
  --overwrite          Overwrite an existing OBJ file
  -h, --help           Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(first) = args.next() else {
            print_usage();
            return Ok(());
        };
        if matches!(first.as_str(), "-h" | "--help" | "help") {
            print_usage();
            return Ok(());
        }

        let input = PathBuf::from(first);
        let mut options = SurfaceOptions::default();
        let mut obj_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut derivative_normals = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--samples" => {
                    let value = args.value("--samples")?;
                    options.sample_resolution = value
                        .parse()
                        .map_err(|e| format!("invalid --samples `{value}`: {e}"))?;
                }
                "--spacing" => {
                    let value = args.value("--spacing")?;
                    options.spacing_multiplier = value
                        .parse()
                        .map_err(|e| format!("invalid --spacing `{value}`: {e}"))?;
                }
                "--boundary" => {
                    options.derivative_boundary = parse_boundary(&args.value("--boundary")?)?;
                }
                "--derivative-normals" => derivative_normals = true,
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let surface = BezierSurface::from_file(&input, options).map_err(|e| e.to_string())?;
        eprint!("{}", surface.diagnostics());

        if derivative_normals {
            let normals = surface.derivative_normals().map_err(|e| e.to_string())?;
            let (min, max) = normals
                .iter()
                .map(|n| n.length())
                .fold((f64::INFINITY, 0.0_f64), |(lo, hi), len| (lo.min(len), hi.max(len)));
            eprintln!("derivative normals: {} (|n| in [{min}, {max}])", normals.len());
        }

        if let Some(path) = obj_path.as_deref() {
            let name = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("surface");
            write_obj_file(path, &surface, name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        Ok(())
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn parse_boundary(value: &str) -> Result<DerivativeBoundary, String> {
        match value {
            "analytic" => Ok(DerivativeBoundary::AnalyticLimit),
            "legacy" => Ok(DerivativeBoundary::LegacyFallback),
            "strict" => Ok(DerivativeBoundary::Strict),
            other => Err(format!("unknown boundary mode `{other}` (analytic | legacy | strict)")),
        }
    }

    fn write_obj_file(
        path: &Path,
        surface: &BezierSurface,
        name: &str,
        overwrite: bool,
    ) -> Result<(), String> {
        let mesh = surface.mesh();
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        mesh.write_obj(BufWriter::new(file), name)
            .map_err(|e| format!("write obj {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
