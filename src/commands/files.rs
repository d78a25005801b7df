//! read_file / write_to_file / append_to_file / delete_file

use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;
use crate::files::FileStore;

pub struct ReadFile(pub Arc<dyn FileStore>);

#[async_trait]
impl Command for ReadFile {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read file"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["file"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Text(self.0.read(args.str("file")?).await?))
    }
}

pub struct WriteToFile(pub Arc<dyn FileStore>);

#[async_trait]
impl Command for WriteToFile {
    fn name(&self) -> &'static str {
        "write_to_file"
    }

    fn description(&self) -> &'static str {
        "Write to file"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["file", "text"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        self.0.write(args.str("file")?, args.str("text")?).await?;
        Ok(CommandOutput::text("File written to successfully."))
    }
}

pub struct AppendToFile(pub Arc<dyn FileStore>);

#[async_trait]
impl Command for AppendToFile {
    fn name(&self) -> &'static str {
        "append_to_file"
    }

    fn description(&self) -> &'static str {
        "Append to file"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["file", "text"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        self.0.append(args.str("file")?, args.str("text")?).await?;
        Ok(CommandOutput::text("Text appended successfully."))
    }
}

pub struct DeleteFile(pub Arc<dyn FileStore>);

#[async_trait]
impl Command for DeleteFile {
    fn name(&self) -> &'static str {
        "delete_file"
    }

    fn description(&self) -> &'static str {
        "Delete file"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["file"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        self.0.delete(args.str("file")?).await?;
        Ok(CommandOutput::text("File deleted successfully."))
    }
}
