//! 朗读通知（speak mode）
//!
//! say 是发出即忘：启动 TTS 进程后立即返回，失败只记日志，不影响命令结果。

use tokio::process::Command;

pub trait VoiceNotifier: Send + Sync {
    fn say(&self, text: &str);
}

/// 关闭朗读时使用
#[derive(Debug, Default)]
pub struct NoopVoice;

impl VoiceNotifier for NoopVoice {
    fn say(&self, _text: &str) {}
}

/// 调用外部 TTS 程序（如 say / espeak），文本作为最后一个参数
#[derive(Debug, Clone)]
pub struct CommandVoice {
    program: String,
    args: Vec<String>,
}

impl CommandVoice {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl VoiceNotifier for CommandVoice {
    fn say(&self, text: &str) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
            }
            Err(e) => tracing::warn!(program = %self.program, error = %e, "voice notifier failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_does_not_panic() {
        let voice = CommandVoice::new("definitely-not-a-tts-program", vec![]);
        voice.say("hello");
        NoopVoice.say("hello");
    }
}
