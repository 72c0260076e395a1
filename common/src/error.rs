use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("内部错误: {0}")]
    Internal(String),

    #[error("过滤器格式错误(缺少'='): {0}")]
    MalformedFilter(String),

    #[error("正则表达式无效: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("注册中心不可达: {0}")]
    RegistryUnreachable(String),

    #[error("注销被注册中心拒绝: HTTP {status}: {body}")]
    DeregisterRejected { status: u16, body: String },

    #[error("URL解析错误: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    IO(#[from] std::io::Error),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Internal(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Internal(err.to_string())
    }
}

// 传输层错误统一视为注册中心不可达
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RegistryUnreachable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
