use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "datazip")]
#[command(version)]
#[command(about = "Extract ZIP archives embedded in base64 data URIs", long_about = None)]
#[command(after_help = "Examples:\n  \
  datazip payload.txt            extract all entries, print name + size\n  \
  datazip -l payload.txt         list entry names only\n  \
  datazip -p payload.txt         print entry contents to stdout\n  \
  cat payload.txt | datazip -    read the data URI from stdin")]
pub struct Cli {
    /// File containing the data URI, or '-' for stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List entry names without extracting contents
    #[arg(short = 'l')]
    pub list: bool,

    /// Print entry contents to stdout
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Expected decoded archive size in bytes (default: derived from the payload)
    #[arg(short = 's', long = "size", value_name = "BYTES")]
    pub size: Option<usize>,

    /// Convert names and contents from this character set (e.g. shift_jis)
    #[arg(long = "convert", value_name = "LABEL")]
    pub convert: Option<String>,

    /// Quiet mode: suppress per-entry progress
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn reads_stdin(&self) -> bool {
        self.file == "-"
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.pipe
    }
}
