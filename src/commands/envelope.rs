//! 信封解析：{"command": {"name": "...", "args": {...}}}
//!
//! 输入来自 LLM，可能夹带 Markdown 代码块或前后说明文字；原文、代码块与花括号片段都作为候选，带 command 的优先。
//! 校验顺序：语法 -> command -> name，任何一步失败都返回 DecodeError，绝不 panic。

use serde_json::{Map, Value};

use crate::core::DecodeError;

/// 解码后的命令：名称与参数（args 缺省为空对象）
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub name: String,
    pub args: Map<String, Value>,
}

/// ```json 代码块：(块内文本, 收尾 ``` 之后的文本)；未闭合时块一直延伸到结尾
fn fenced_block(text: &str) -> Option<(&str, &str)> {
    let start = text.find("```json")?;
    let rest = &text[start + 7..];
    Some(match rest.find("```") {
        Some(end) => (rest[..end].trim(), &rest[end + 3..]),
        None => (rest.trim(), ""),
    })
}

/// 首个 '{' 到最后一个 '}'
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// 依次尝试：原文、代码块、代码块之后的花括号片段、全文花括号片段；返回能解析的 JSON
fn json_candidates(text: &str) -> impl Iterator<Item = Value> + '_ {
    let trimmed = text.trim();
    let fenced = fenced_block(trimmed);
    [
        Some(trimmed),
        fenced.map(|(body, _)| body),
        fenced.and_then(|(_, after)| brace_span(after)),
        brace_span(trimmed),
    ]
    .into_iter()
    .flatten()
    .filter_map(|s| serde_json::from_str(s).ok())
}

/// 宽松解析 JSON：只要有一个候选片段能解析即可
pub fn parse_json(text: &str) -> Option<Value> {
    json_candidates(text).next()
}

/// 空值（null、""、[]、{}、false、0）视为未提供参数
fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn parse(raw: &str) -> Result<Envelope, DecodeError> {
    let mut candidates: Vec<Value> = json_candidates(raw).collect();
    if candidates.is_empty() {
        return Err(DecodeError::InvalidSyntax);
    }
    // 带 command 的候选优先
    let index = candidates
        .iter()
        .position(|v| v.get("command").is_some())
        .unwrap_or(0);
    let value = candidates.swap_remove(index);
    let root = value
        .as_object()
        .ok_or_else(|| DecodeError::Internal("Expected a JSON object".to_string()))?;

    let command = root
        .get("command")
        .ok_or(DecodeError::MissingField("command"))?
        .as_object()
        .ok_or_else(|| DecodeError::Internal("'command' must be an object".to_string()))?;

    let name = command
        .get("name")
        .ok_or(DecodeError::MissingField("name"))?
        .as_str()
        .ok_or_else(|| DecodeError::Internal("'name' must be a string".to_string()))?;

    let args = match command.get("args") {
        None => Map::new(),
        Some(v) if is_empty_value(v) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(DecodeError::Internal("'args' must be an object".to_string())),
    };

    Ok(Envelope {
        name: name.to_string(),
        args,
    })
}
