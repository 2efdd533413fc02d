use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use utilbox::file::{self, TempFileOptions};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct FileArgs {
    #[command(subcommand)]
    command: FileCommand,
}

#[derive(Subcommand)]
enum FileCommand {
    /// Delete a file (succeeds if it does not exist)
    Delete { path: PathBuf },
    /// Delete everything inside a directory, keeping the directory
    DeleteContents { dir: PathBuf },
    /// Create an empty, uniquely named file
    Temp {
        dir: PathBuf,
        #[arg(long, default_value = "")]
        prefix: String,
        /// Give up after this many milliseconds (default from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Debug, Serialize)]
pub struct FileOutput {
    command: String,
    path: String,
}

fn output(command: &str, path: &Path) -> CmdResult<FileOutput> {
    Ok((
        FileOutput {
            command: command.to_string(),
            path: path.display().to_string(),
        },
        0,
    ))
}

pub fn run(args: FileArgs, global: &GlobalArgs) -> CmdResult<FileOutput> {
    match args.command {
        FileCommand::Delete { path } => {
            file::delete(&path)?;
            output("file.delete", &path)
        }
        FileCommand::DeleteContents { dir } => {
            file::delete_directory_contents(&dir)?;
            output("file.delete_contents", &dir)
        }
        FileCommand::Temp {
            dir,
            prefix,
            timeout_ms,
        } => {
            let mut options = TempFileOptions::from(&global.defaults.temp_file);
            if let Some(ms) = timeout_ms {
                options.timeout = Duration::from_millis(ms);
            }
            let created = file::create_temp_file(&dir, &prefix, &options)?;
            output("file.temp", &created)
        }
    }
}
