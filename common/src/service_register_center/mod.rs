// 导入标准库和必要的依赖
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

// 声明子模块
pub mod consul;
pub mod typos;

// 导入类型定义
pub use crate::service_register_center::consul::{Consul, ConsulOptions};
pub use crate::service_register_center::typos::{CatalogSummary, DeregisterOutcome, ServiceRecord};

use crate::Result;

/// 注册中心客户端接口
///
/// 覆盖本工具需要的最小访问面：目录摘要、按名称查询节点记录、按ID注销。
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// 该客户端指向的注册中心基础URI
    fn base_uri(&self) -> String;

    /// 目录服务摘要: { 服务名: [标签,...] }
    async fn services(&self) -> Result<CatalogSummary>;

    /// 某个服务名下所有节点的记录
    async fn service_nodes(&self, service_name: &str) -> Result<Vec<ServiceRecord>>;

    /// 按服务ID在该注册中心注销实例
    ///
    /// # 返回
    /// 成功返回 Ok(()), 被拒绝或不可达返回 Error
    async fn deregister(&self, service_id: &str) -> Result<()>;
}

/// 注册中心客户端定位器
///
/// 按URL字符串缓存客户端句柄，同一URL重复获取时复用同一个句柄。
/// 缓存只在一次调用进程内有效；当前执行模型是单线程顺序调用，
/// 不需要加锁，如果以后并行抓取则必须改为并发映射。
pub struct ClientLocator {
    timeout: u64,
    cache: HashMap<String, Arc<dyn RegistryClient>>,
}

impl ClientLocator {
    pub fn new(timeout: u64) -> Self {
        Self {
            timeout,
            cache: HashMap::new(),
        }
    }

    /// 获取指向给定URL的客户端，必要时创建并放入缓存
    pub fn client_for_url(&mut self, url: &str) -> Result<Arc<dyn RegistryClient>> {
        if let Some(client) = self.cache.get(url) {
            return Ok(client.clone());
        }

        let options = ConsulOptions::from_url(url, self.timeout)?;
        let client: Arc<dyn RegistryClient> = Arc::new(Consul::new(options));
        self.cache.insert(url.to_string(), client.clone());
        Ok(client)
    }

    /// 获取负责某条记录的客户端
    ///
    /// 注销必须发往记录所在节点本地的agent，所以目标URL用基础URL的
    /// 协议和显式端口加上记录自身的地址推导出来。
    pub fn client_for_record(
        &mut self,
        base_url: &str,
        record: &ServiceRecord,
    ) -> Result<Arc<dyn RegistryClient>> {
        let derived = derive_record_url(base_url, record)?;
        self.client_for_url(&derived)
    }

    /// 测试用：预置一个客户端句柄
    #[doc(hidden)]
    pub fn seed(&mut self, url: &str, client: Arc<dyn RegistryClient>) {
        self.cache.insert(url.to_string(), client);
    }
}

/// 推导一条记录的注销端点URL
///
/// 协议取自基础URL；端口只有在基础URL中显式出现时才带上，
/// 否则由客户端构造时落回默认的8500；主机替换为记录的地址。
pub fn derive_record_url(base_url: &str, record: &ServiceRecord) -> Result<String> {
    let parsed = Url::parse(base_url)?;
    let url = match consul::explicit_port(base_url, &parsed) {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), record.address, port),
        None => format!("{}://{}", parsed.scheme(), record.address),
    };
    Ok(url)
}

/// 注册中心访问入口
///
/// 组合客户端定位器与全局基础URL，提供目录读取和批量注销。
/// 读路径上的任何失败都会中断整个命令；写路径（注销）逐条记录
/// 上报结果，单条失败不中断批量流程。
pub struct Registry {
    base_url: String,
    locator: ClientLocator,
}

impl Registry {
    pub fn new(base_url: impl Into<String>, timeout: u64) -> Self {
        Self {
            base_url: base_url.into(),
            locator: ClientLocator::new(timeout),
        }
    }

    /// 测试用：访问内部定位器
    #[doc(hidden)]
    pub fn locator_mut(&mut self) -> &mut ClientLocator {
        &mut self.locator
    }

    /// 目录内所有服务名，去重后排序
    pub async fn service_names(&mut self) -> Result<Vec<String>> {
        let client = self.locator.client_for_url(&self.base_url)?;
        let summary = client.services().await?;
        let mut names: Vec<String> = summary.into_keys().collect();
        names.sort();
        Ok(names)
    }

    /// 所有服务使用过的标签，去重后排序
    pub async fn all_tags(&mut self) -> Result<Vec<String>> {
        let client = self.locator.client_for_url(&self.base_url)?;
        let summary = client.services().await?;
        Ok(collect_tags(&summary))
    }

    /// 所有服务的全部节点记录
    ///
    /// 按服务名逐个查询目录，节点列表原样追加：服务名之间本来互不重复，
    /// 一个服务名下每个节点各占一条，所以不做任何去重。
    pub async fn all_records(&mut self) -> Result<Vec<ServiceRecord>> {
        let names = self.service_names().await?;
        let client = self.locator.client_for_url(&self.base_url)?;

        let mut records = Vec::new();
        for name in &names {
            records.extend(client.service_nodes(name).await?);
        }
        debug!("目录共返回{}条服务记录", records.len());
        Ok(records)
    }

    /// 注销一条记录，目标端点由记录自身地址推导
    ///
    /// 每条记录可能指向不同的agent端点，所以注册中心拒绝和端点不可达
    /// 都只体现在success=false上，不中断调用方的批量流程。
    pub async fn deregister_record(&mut self, record: &ServiceRecord) -> Result<DeregisterOutcome> {
        let client = self.locator.client_for_record(&self.base_url, record)?;
        let endpoint = client.base_uri();

        let success = match client.deregister(&record.service_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!("注销 {} 失败: {}", record.service_id, err);
                false
            }
        };

        Ok(DeregisterOutcome {
            success,
            endpoint,
            service_id: record.service_id.clone(),
        })
    }

    /// 按输入顺序逐条注销，每条记录产生一个结果
    pub async fn deregister_all(
        &mut self,
        records: &[ServiceRecord],
    ) -> Result<Vec<DeregisterOutcome>> {
        let mut outcomes = Vec::with_capacity(records.len());
        for record in records {
            outcomes.push(self.deregister_record(record).await?);
        }
        Ok(outcomes)
    }
}

/// 汇总目录摘要中所有服务的标签，去重并排序
pub fn collect_tags(summary: &CatalogSummary) -> Vec<String> {
    let tags: BTreeSet<String> = summary.values().flatten().cloned().collect();
    tags.into_iter().collect()
}
