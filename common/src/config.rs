use config::{Config, Environment};
use serde::Deserialize;

use crate::Result;

/// 默认的Consul地址，与原生agent的本地端口一致
pub const DEFAULT_CONSUL_URL: &str = "http://localhost:8500";

/// 服务注册中心配置
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceCenterConfig {
    /// 注册中心基础URL
    pub url: String,
    /// HTTP请求超时时间（秒）
    pub timeout: u64,
}

impl ServiceCenterConfig {
    /// 加载配置
    ///
    /// 优先级从低到高：内置默认值、CONSUL_URL/CONSUL_TIMEOUT环境变量、
    /// 命令行传入的URL覆盖。
    pub fn load(url_override: Option<String>) -> Result<Self> {
        let cfg = Config::builder()
            .set_default("url", DEFAULT_CONSUL_URL)?
            .set_default("timeout", 5i64)?
            .add_source(Environment::with_prefix("CONSUL"))
            .build()?;

        let mut parsed: ServiceCenterConfig = cfg.try_deserialize()?;
        if let Some(url) = url_override {
            parsed.url = url;
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_wins_over_everything() {
        let config = ServiceCenterConfig::load(Some("http://consul.test:9500".to_string())).unwrap();
        assert_eq!(config.url, "http://consul.test:9500");
        assert!(config.timeout > 0);
    }
}
