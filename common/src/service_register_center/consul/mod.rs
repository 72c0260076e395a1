use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::service_register_center::typos::{CatalogSummary, ServiceRecord};
use crate::service_register_center::RegistryClient;
use crate::{Error, Result};

/// Consul client configuration options
#[derive(Debug, Clone)]
pub struct ConsulOptions {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub timeout: u64,
}

impl ConsulOptions {
    /// 从URL解析出协议、主机和端口，未显式指定端口时默认8500
    pub fn from_url(url: &str, timeout: u64) -> Result<Self> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::Internal(format!("URL缺少主机名: {}", url)))?
            .to_string();

        Ok(Self {
            host,
            port: explicit_port(url, &parsed).unwrap_or(8500),
            protocol: parsed.scheme().to_string(),
            timeout,
        })
    }

    /// 注册中心HTTP API的基础URI
    pub fn base_uri(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// 从URL原文中取出显式写出的端口
///
/// Url对已知协议的默认端口(如http的80)在解析后返回None，
/// 显式写出来的默认端口只能从原文的authority部分恢复。
pub(crate) fn explicit_port(url_text: &str, parsed: &Url) -> Option<u16> {
    if let Some(port) = parsed.port() {
        return Some(port);
    }
    let after_scheme = url_text.splitn(2, "://").nth(1)?;
    let authority = after_scheme.split(['/', '?', '#']).next()?;
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, rest)| rest);
    let (_, port) = host_port.rsplit_once(':')?;
    port.parse().ok()
}

/// Consul注册中心客户端
///
/// 直接使用HTTP API与Consul交互，只覆盖目录读取和agent注销接口。
#[derive(Debug, Clone)]
pub struct Consul {
    pub options: ConsulOptions,
    client: reqwest::Client,
}

impl Consul {
    pub fn new(options: ConsulOptions) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { options, client }
    }
}

#[async_trait]
impl RegistryClient for Consul {
    fn base_uri(&self) -> String {
        self.options.base_uri()
    }

    async fn services(&self) -> Result<CatalogSummary> {
        let url = format!("{}/v1/catalog/services", self.base_uri());
        debug!("查询服务目录: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::RegistryUnreachable(format!(
                "HTTP {}: {}",
                response.status(),
                url
            )));
        }

        Ok(response.json().await?)
    }

    async fn service_nodes(&self, service_name: &str) -> Result<Vec<ServiceRecord>> {
        let url = format!("{}/v1/catalog/service/{}", self.base_uri(), service_name);
        debug!("查询服务节点: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::RegistryUnreachable(format!(
                "HTTP {}: {}",
                response.status(),
                url
            )));
        }

        Ok(response.json().await?)
    }

    async fn deregister(&self, service_id: &str) -> Result<()> {
        let url = format!(
            "{}/v1/agent/service/deregister/{}",
            self.base_uri(),
            service_id
        );
        debug!("注销服务: {}", url);

        let response = self.client.put(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(Error::DeregisterRejected { status, body })
        }
    }
}
