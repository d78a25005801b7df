//! evaluate_code / improve_code / write_tests / execute_python_file

use std::sync::Arc;

use async_trait::async_trait;

use crate::code::{CodeAssistant, PythonRunner};
use crate::commands::{Args, Command, CommandOutput};
use crate::core::CommandError;

fn assistant_error(e: String) -> CommandError {
    CommandError::collaborator("code assistant", e)
}

pub struct EvaluateCode(pub Arc<dyn CodeAssistant>);

#[async_trait]
impl Command for EvaluateCode {
    fn name(&self) -> &'static str {
        "evaluate_code"
    }

    fn description(&self) -> &'static str {
        "Evaluate Code"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["code"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let code = args.str("code")?;
        let result = self.0.evaluate_code(code).await.map_err(assistant_error)?;
        Ok(CommandOutput::Text(result))
    }
}

pub struct ImproveCode(pub Arc<dyn CodeAssistant>);

#[async_trait]
impl Command for ImproveCode {
    fn name(&self) -> &'static str {
        "improve_code"
    }

    fn description(&self) -> &'static str {
        "Get Improved Code"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["suggestions", "code"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let suggestions = args.str_list("suggestions")?;
        let code = args.str("code")?;
        let result = self
            .0
            .improve_code(&suggestions, code)
            .await
            .map_err(assistant_error)?;
        Ok(CommandOutput::Text(result))
    }
}

pub struct WriteTests(pub Arc<dyn CodeAssistant>);

#[async_trait]
impl Command for WriteTests {
    fn name(&self) -> &'static str {
        "write_tests"
    }

    fn description(&self) -> &'static str {
        "Write Tests"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["code"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let code = args.str("code")?;
        let focus = args.str_list("focus")?;
        let result = self.0.write_tests(code, &focus).await.map_err(assistant_error)?;
        Ok(CommandOutput::Text(result))
    }
}

pub struct ExecutePythonFile(pub Arc<dyn PythonRunner>);

#[async_trait]
impl Command for ExecutePythonFile {
    fn name(&self) -> &'static str {
        "execute_python_file"
    }

    fn description(&self) -> &'static str {
        "Execute Python File"
    }

    fn required_args(&self) -> &'static [&'static str] {
        &["file"]
    }

    async fn execute(&self, args: &Args) -> Result<CommandOutput, CommandError> {
        let output = self.0.execute_file(args.str("file")?).await?;
        Ok(CommandOutput::Text(output))
    }
}
