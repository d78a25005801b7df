//! 命令参数：带命令名的参数表，类型化取值失败时给出 MissingArgument / InvalidArgument

use serde_json::{Map, Value};

use crate::core::CommandError;

#[derive(Debug, Clone, Default)]
pub struct Args {
    command: String,
    values: Map<String, Value>,
}

impl Args {
    pub fn new(command: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            command: command.into(),
            values,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// 字段是否出现（值为 null 也算出现）
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    fn missing(&self, field: &str) -> CommandError {
        CommandError::MissingArgument {
            command: self.command.clone(),
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, expected: &'static str) -> CommandError {
        CommandError::InvalidArgument {
            command: self.command.clone(),
            field: field.to_string(),
            expected,
        }
    }

    pub fn str(&self, field: &str) -> Result<&str, CommandError> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_str()
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    /// 整数：接受 JSON 整数或数字字符串（如 "3"）
    ///
    /// 取 i128，超出 i64 的整数（如 u64::MAX）也能交给调用方做范围判断。
    pub fn int(&self, field: &str) -> Result<i128, CommandError> {
        match self.get(field).ok_or_else(|| self.missing(field))? {
            Value::Number(n) => n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i128))
                .ok_or_else(|| self.invalid(field, "an integer")),
            Value::String(s) => s.trim().parse().map_err(|_| self.invalid(field, "an integer")),
            _ => Err(self.invalid(field, "an integer")),
        }
    }

    /// 字符串列表：接受单个字符串或字符串数组；缺失或 null 视为空列表
    pub fn str_list(&self, field: &str) -> Result<Vec<String>, CommandError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(String::from)
                        .ok_or_else(|| self.invalid(field, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(field, "a string or a list of strings")),
        }
    }
}
