use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "qr-outline")]
#[command(version, about = "Outline every QR code symbol found in an image")]
pub struct Cli {
    /// Input image (PNG, JPEG, GIF, BMP, TIFF or WebP)
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Output path [default: <file>_detected.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print symbol corners and full error chains
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| detected_path(&self.file))
    }
}

/// `dir/name.ext` -> `dir/name_detected.png`
pub fn detected_path(input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push("_detected.png");
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_path_replaces_extension() {
        assert_eq!(
            detected_path(Path::new("shots/code.jpeg")),
            PathBuf::from("shots/code_detected.png")
        );
        assert_eq!(
            detected_path(Path::new("code.png")),
            PathBuf::from("code_detected.png")
        );
    }

    #[test]
    fn test_detected_path_only_last_extension() {
        assert_eq!(
            detected_path(Path::new("a.png.d/scan.tar.webp")),
            PathBuf::from("a.png.d/scan.tar_detected.png")
        );
    }

    #[test]
    fn test_detected_path_without_extension() {
        assert_eq!(
            detected_path(Path::new("dir/photo")),
            PathBuf::from("dir/photo_detected.png")
        );
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from(["qr-outline", "-f", "in.gif", "-v"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("in.gif"));
        assert!(cli.verbose);
        assert_eq!(cli.output_path(), PathBuf::from("in_detected.png"));
    }

    #[test]
    fn test_parse_long_flags_with_output() {
        let cli = Cli::try_parse_from([
            "qr-outline",
            "--file",
            "in.gif",
            "--output",
            "out/boxes.png",
        ])
        .unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.output_path(), PathBuf::from("out/boxes.png"));
    }

    #[test]
    fn test_file_is_required() {
        let err = Cli::try_parse_from(["qr-outline", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[cfg(unix)]
    #[test]
    fn test_detected_path_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new("scans").join(OsStr::from_bytes(b"caf\xe9.jpg"));
        assert_eq!(
            detected_path(&input),
            Path::new("scans").join(OsStr::from_bytes(b"caf\xe9_detected.png"))
        );
    }
}
