//! File naming conventions for compressed files, and the report that the
//! command line tool prints.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The extension of compressed files.
pub const FILE_EXTENSION: &str = ".rle";

/// The directory that receives outputs that have no natural name.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Return True if 'path' names a compressed file.
pub fn has_extension(path: &Path) -> bool {
    path.to_string_lossy().ends_with(FILE_EXTENSION)
}

/// Come up with an output path for 'input'. Compressing adds the extension
/// and decompressing removes it. Decompressing a file without the extension
/// writes a file with the same name into 'DEFAULT_OUTPUT_DIR'.
pub fn derive_output_path(input: &Path, compress: bool) -> PathBuf {
    let name = input.to_string_lossy();
    if compress {
        return PathBuf::from(format!("{}{}", name, FILE_EXTENSION));
    }

    if let Some(stripped) = name.strip_suffix(FILE_EXTENSION) {
        if !stripped.is_empty() {
            return PathBuf::from(stripped);
        }
    }

    let file_name = input.file_name().unwrap_or(input.as_os_str());
    Path::new(DEFAULT_OUTPUT_DIR).join(file_name)
}

/// Summary of one run over a pair of files.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub elapsed: Duration,
}

impl Statistics {
    /// Returns the input size divided by the output size, or None if the
    /// output is empty.
    pub fn ratio(&self) -> Option<f64> {
        if self.bytes_out == 0 {
            return None;
        }
        Some(self.bytes_in as f64 / self.bytes_out as f64)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Input:  {} ({} bytes)",
            self.input.display(),
            self.bytes_in
        )?;
        writeln!(
            f,
            "Output: {} ({} bytes)",
            self.output.display(),
            self.bytes_out
        )?;
        match self.ratio() {
            Some(ratio) => writeln!(f, "Ratio:  {:.4}x", ratio)?,
            None => writeln!(f, "Ratio:  n/a")?,
        }
        write!(f, "Time:   {:.3} seconds", self.elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_report() {
        let mut stats = Statistics {
            input: PathBuf::from("a.txt"),
            output: PathBuf::from("a.txt.rle"),
            bytes_in: 300,
            bytes_out: 120,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(stats.ratio(), Some(2.5));
        let report = stats.to_string();
        assert_eq!(
            report,
            "Input:  a.txt (300 bytes)\n\
             Output: a.txt.rle (120 bytes)\n\
             Ratio:  2.5000x\n\
             Time:   1.500 seconds"
        );

        stats.bytes_out = 0;
        assert_eq!(stats.ratio(), None);
        assert!(stats.to_string().contains("Ratio:  n/a"));
    }

    #[test]
    fn test_output_names() {
        let p = Path::new("dir/text.txt");
        assert_eq!(derive_output_path(p, true), Path::new("dir/text.txt.rle"));
        let p = Path::new("dir/text.txt.rle");
        assert!(has_extension(p));
        assert_eq!(derive_output_path(p, false), Path::new("dir/text.txt"));
        let p = Path::new("dir/text.bin");
        assert!(!has_extension(p));
        assert_eq!(derive_output_path(p, false), Path::new("out/text.bin"));
    }
}
