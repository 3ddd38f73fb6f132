use clap::Parser;
use square_crop::config::ProcessingConfig;
use square_crop::{logging, output, process};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "square-crop")]
#[command(about = "Crop a directory tree of images to centered squares")]
#[command(long_about = "\
Crop a directory tree of images to centered squares

Every .jpg, .jpeg, .png, .webp, .tiff and .gif file under ./input is cropped
to its largest centered square, scaled down to at most 1024x1024 (never up),
re-encoded in its own format and written to the same relative path under
./output.

  input/                      output/
  ├── a.jpg   (2000x1000)     ├── a.jpg   (1000x1000)
  └── sub/                    └── sub/
      └── b.png (500x500)         └── b.png (500x500)

JPEG and WebP are written at quality 80, PNG at maximum compression. Other
files are skipped. Set SQUARE_CROP_LOG=debug for diagnostic logging on stderr.")]
#[command(version)]
struct Cli {}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let _cli = Cli::parse();
    logging::init();

    let config = ProcessingConfig::default();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });

    let result = process::process(&config, Some(tx));
    printer
        .join()
        .map_err(|_| "output thread panicked")?;

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Aborted: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    if summary.discovered > 0 {
        output::print_summary(&summary);
    }

    if summary.failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
